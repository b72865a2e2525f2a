// scroll.rs - Virtual page of sections and the scroll-bound timelines on top of it

use crate::choreography::Choreography;
use crate::device::DeviceClass;
use crate::scene::Transform;
use crate::timeline::{Ease, Timeline};

/// Vertical extent of one section in page pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBounds {
    pub top: f32,
    pub bottom: f32,
}

impl SectionBounds {
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// The scrollable page: sections stacked top to bottom and the scroll offset
#[derive(Debug, Clone)]
pub struct PageLayout {
    sections: Vec<SectionBounds>,
    section_height: f32,
    viewport_height: f32,
    scroll: f32,
}

impl PageLayout {
    /// `count` sections, each `section_height` viewport heights tall
    pub fn uniform(count: usize, section_height: f32, viewport_height: f32) -> Self {
        let mut layout = Self {
            sections: Vec::with_capacity(count),
            section_height: section_height.max(0.0),
            viewport_height: viewport_height.max(0.0),
            scroll: 0.0,
        };
        layout.relayout(count);
        layout
    }

    fn relayout(&mut self, count: usize) {
        let height = self.section_height * self.viewport_height;
        self.sections = (0..count)
            .map(|index| SectionBounds {
                top: index as f32 * height,
                bottom: (index + 1) as f32 * height,
            })
            .collect();
    }

    pub fn sections(&self) -> &[SectionBounds] {
        &self.sections
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn page_height(&self) -> f32 {
        self.sections.last().map_or(0.0, |section| section.bottom)
    }

    pub fn max_scroll(&self) -> f32 {
        (self.page_height() - self.viewport_height).max(0.0)
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Set the scroll offset, clamped to the page. Returns whether it moved.
    pub fn scroll_to(&mut self, offset: f32) -> bool {
        let clamped = offset.clamp(0.0, self.max_scroll());
        let moved = clamped != self.scroll;
        self.scroll = clamped;
        moved
    }

    pub fn scroll_by(&mut self, delta: f32) -> bool {
        self.scroll_to(self.scroll + delta)
    }

    /// Lay the page out for a new viewport height, keeping the relative scroll position
    pub fn resize(&mut self, viewport_height: f32) {
        let max_before = self.max_scroll();
        let ratio = if max_before > 0.0 { self.scroll / max_before } else { 0.0 };

        self.viewport_height = viewport_height.max(0.0);
        self.relayout(self.sections.len());
        self.scroll = (ratio * self.max_scroll()).clamp(0.0, self.max_scroll());
    }

    /// Section under the viewport centre
    pub fn current_section(&self) -> Option<usize> {
        let centre = self.scroll + self.viewport_height / 2.0;
        self.sections
            .iter()
            .position(|section| centre < section.bottom)
            .or_else(|| self.sections.len().checked_sub(1))
    }
}

/// Scroll range over which a timeline plays from start to end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTrigger {
    pub start: f32,
    pub end: f32,
}

impl ScrollTrigger {
    /// Starts when the section's top reaches the viewport centre, ends when its bottom does
    pub fn top_center_to_bottom_center(bounds: SectionBounds, viewport_height: f32) -> Self {
        let centre = viewport_height / 2.0;
        Self {
            start: bounds.top - centre,
            end: bounds.bottom - centre,
        }
    }

    pub fn progress(&self, scroll: f32) -> f32 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / span).clamp(0.0, 1.0)
    }
}

/// One section's timeline and its trigger
#[derive(Debug, Clone)]
pub struct SectionAnimation {
    pub index: usize,
    pub trigger: ScrollTrigger,
    pub timeline: Timeline,
}

/// Scroll-bound timelines for every page section
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    choreography: Choreography,
    device: DeviceClass,
    ease: Ease,
    sections: Vec<SectionAnimation>,
    /// Scroll offset of the previous update
    last_scroll: Option<f32>,
}

impl ScrollAnimator {
    pub fn new(choreography: Choreography, device: DeviceClass, ease: Ease) -> Self {
        Self {
            choreography,
            device,
            ease,
            sections: Vec::new(),
            last_scroll: None,
        }
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    /// Create the timeline for section `index`. Indices without keyframes get an empty timeline.
    pub fn setup_scroll_animation(
        &mut self,
        bounds: SectionBounds,
        index: usize,
        viewport_height: f32,
    ) -> &SectionAnimation {
        let steps = self.choreography.steps(index, self.device);
        let animation = SectionAnimation {
            index,
            trigger: ScrollTrigger::top_center_to_bottom_center(bounds, viewport_height),
            timeline: Timeline::from_steps(steps, self.ease),
        };
        log::debug!(
            "Section {} ({}): {} steps over {:.1}s, scroll {:.0}..{:.0}",
            index,
            self.device.name(),
            animation.timeline.len(),
            animation.timeline.duration(),
            animation.trigger.start,
            animation.trigger.end
        );

        self.sections.push(animation);
        &self.sections[self.sections.len() - 1]
    }

    /// Create one timeline per page section, replacing any existing ones
    pub fn arm(&mut self, layout: &PageLayout) {
        self.sections.clear();
        self.last_scroll = None;
        for (index, bounds) in layout.sections().iter().enumerate() {
            self.setup_scroll_animation(*bounds, index, layout.viewport_height());
        }
    }

    pub fn is_armed(&self) -> bool {
        !self.sections.is_empty()
    }

    pub fn sections(&self) -> &[SectionAnimation] {
        &self.sections
    }

    /// Seek every timeline to its progress at `scroll`. Scrolling down visits
    /// sections top to bottom, scrolling up bottom to top, so later sections
    /// hand their start values back before earlier ones rewind.
    pub fn update(&mut self, scroll: f32, transform: &mut Transform) -> bool {
        let backwards = self.last_scroll.is_some_and(|last| scroll < last);
        self.last_scroll = Some(scroll);

        let mut changed = false;
        let mut seek = |section: &mut SectionAnimation| {
            let progress = section.trigger.progress(scroll);
            changed |= section.timeline.seek(progress, transform);
        };
        if backwards {
            self.sections.iter_mut().rev().for_each(&mut seek);
        } else {
            self.sections.iter_mut().for_each(&mut seek);
        }
        changed
    }

    /// Recompute triggers after the page was laid out again
    pub fn refresh(&mut self, layout: &PageLayout) {
        for section in &mut self.sections {
            if let Some(bounds) = layout.sections().get(section.index) {
                section.trigger = ScrollTrigger::top_center_to_bottom_center(*bounds, layout.viewport_height());
            }
        }
    }
}
