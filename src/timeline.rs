// timeline.rs - Keyframe timelines seeked by progress instead of a clock

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::{Property, Transform};

/// Target value per axis; `None` leaves that axis alone
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Axes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Axes {
    pub const fn xyz(x: f32, y: f32, z: f32) -> Self {
        Self { x: Some(x), y: Some(y), z: Some(z) }
    }

    pub const fn x(x: f32) -> Self {
        Self { x: Some(x), y: None, z: None }
    }

    pub const fn y(y: f32) -> Self {
        Self { x: None, y: Some(y), z: None }
    }

    pub const fn xz(x: f32, z: f32) -> Self {
        Self { x: Some(x), y: None, z: Some(z) }
    }

    pub const fn yz(y: f32, z: f32) -> Self {
        Self { x: None, y: Some(y), z: Some(z) }
    }

    pub const fn uniform(v: f32) -> Self {
        Self::xyz(v, v, v)
    }

    /// Overlay the set axes onto `base`
    pub fn apply(&self, base: Vec3) -> Vec3 {
        Vec3::new(
            self.x.unwrap_or(base.x),
            self.y.unwrap_or(base.y),
            self.z.unwrap_or(base.z),
        )
    }
}

/// Where a step starts relative to the steps before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// At the current end of the timeline
    #[default]
    Append,
    /// Together with the previous step (time 0 for the first)
    WithPrevious,
}

/// Easing curve applied to every step of a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Ease {
    Linear,
    #[default]
    #[value(name = "power1-out")]
    Power1Out,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// One authored keyframe step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TweenSpec {
    pub property: Property,
    pub target: Axes,
    pub duration: f32,
    #[serde(default)]
    pub placement: Placement,
}

impl TweenSpec {
    pub const fn new(property: Property, target: Axes, duration: f32) -> Self {
        Self {
            property,
            target,
            duration,
            placement: Placement::Append,
        }
    }

    pub const fn scale(target: Axes, duration: f32) -> Self {
        Self::new(Property::Scale, target, duration)
    }

    pub const fn position(target: Axes, duration: f32) -> Self {
        Self::new(Property::Position, target, duration)
    }

    pub const fn rotation(target: Axes, duration: f32) -> Self {
        Self::new(Property::Rotation, target, duration)
    }

    pub const fn with_previous(mut self) -> Self {
        self.placement = Placement::WithPrevious;
        self
    }
}

#[derive(Debug, Clone)]
struct Tween {
    spec: TweenSpec,
    start: f32,
    /// Start values, captured the first time playback enters the step
    from: Option<Vec3>,
}

impl Tween {
    fn end(&self) -> f32 {
        self.start + self.spec.duration
    }

    fn render(&mut self, time: f32, ease: Ease, transform: &mut Transform) {
        let local = time - self.start;
        let from = match self.from {
            Some(from) => from,
            None if local <= 0.0 => return,
            None => *self.from.insert(transform.get(self.spec.property)),
        };

        let t = if self.spec.duration > 0.0 {
            local / self.spec.duration
        } else if local >= 0.0 {
            1.0
        } else {
            0.0
        };
        let e = ease.apply(t);
        let lerp = |from: f32, to: f32| from * (1.0 - e) + to * e;
        let target = self.spec.target;
        let value = transform.get_mut(self.spec.property);
        if let Some(x) = target.x {
            value.x = lerp(from.x, x);
        }
        if let Some(y) = target.y {
            value.y = lerp(from.y, y);
        }
        if let Some(z) = target.z {
            value.z = lerp(from.z, z);
        }
    }
}

/// Ordered tweens scrubbed by progress
#[derive(Debug, Clone)]
pub struct Timeline {
    tweens: Vec<Tween>,
    duration: f32,
    ease: Ease,
    time: f32,
    rendered: bool,
}

impl Timeline {
    pub fn new(ease: Ease) -> Self {
        Self {
            tweens: Vec::new(),
            duration: 0.0,
            ease,
            time: 0.0,
            rendered: false,
        }
    }

    /// Build a timeline from authored steps
    pub fn from_steps(steps: &[TweenSpec], ease: Ease) -> Self {
        let mut timeline = Self::new(ease);
        for step in steps {
            timeline.push(*step);
        }
        timeline
    }

    /// Add a step, placed according to its `placement`
    pub fn push(&mut self, spec: TweenSpec) -> &mut Self {
        let start = match spec.placement {
            Placement::Append => self.duration,
            Placement::WithPrevious => self.tweens.last().map_or(0.0, |tween| tween.start),
        };
        let tween = Tween { spec, start, from: None };
        self.duration = self.duration.max(tween.end());
        self.tweens.push(tween);
        self
    }

    /// Shorthand for an appended step
    pub fn to(&mut self, property: Property, target: Axes, duration: f32) -> &mut Self {
        self.push(TweenSpec::new(property, target, duration))
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn ease(&self) -> Ease {
        self.ease
    }

    /// Steps with their start times
    pub fn steps(&self) -> impl Iterator<Item = (f32, &TweenSpec)> {
        self.tweens.iter().map(|tween| (tween.start, &tween.spec))
    }

    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            self.time / self.duration
        } else {
            0.0
        }
    }

    /// Move the playhead to `progress` and write every affected step into
    /// `transform`. Returns whether the transform changed.
    pub fn seek(&mut self, progress: f32, transform: &mut Transform) -> bool {
        if self.tweens.is_empty() {
            return false;
        }

        let time = progress.clamp(0.0, 1.0) * self.duration;
        if self.rendered && time == self.time {
            return false;
        }

        let before = *transform;
        let (lo, hi) = if time < self.time { (time, self.time) } else { (self.time, time) };
        let backwards = time < self.time;
        let ease = self.ease;

        let mut visit = |tween: &mut Tween| {
            if tween.end() < lo || tween.start > hi {
                return;
            }
            tween.render(time, ease, transform);
        };
        if backwards {
            self.tweens.iter_mut().rev().for_each(&mut visit);
        } else {
            self.tweens.iter_mut().for_each(&mut visit);
        }

        self.time = time;
        self.rendered = true;
        *transform != before
    }
}
