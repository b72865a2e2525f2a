/// Window dimensions in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDimensions {
    pub width: u32,
    pub height: u32,
}

impl WindowDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; 1.0 for a degenerate window
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The window as seen by scene components: its size and the redraw request
pub trait WindowContext {
    /// Get window dimensions in physical pixels
    fn dimensions(&self) -> WindowDimensions;

    /// Request the window to redraw
    fn request_redraw(&self);
}

impl WindowContext for winit::window::Window {
    fn dimensions(&self) -> WindowDimensions {
        let size = self.inner_size();
        WindowDimensions::new(size.width, size.height)
    }

    fn request_redraw(&self) {
        winit::window::Window::request_redraw(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_window_dimensions_new() {
        let dims = WindowDimensions::new(1920, 1080);
        assert_eq!(dims.width, 1920);
        assert_eq!(dims.height, 1080);
    }

    #[test]
    fn test_window_dimensions_aspect() {
        assert_eq!(WindowDimensions::new(1920, 1080).aspect(), 1920.0 / 1080.0);
        assert_eq!(WindowDimensions::new(800, 0).aspect(), 1.0);
    }

    #[test]
    fn test_window_dimensions_empty() {
        assert!(WindowDimensions::new(0, 600).is_empty());
        assert!(WindowDimensions::new(800, 0).is_empty());
        assert!(!WindowDimensions::new(1, 1).is_empty());
    }

    // Mock window for testing trait implementation
    struct MockWindow {
        dims: WindowDimensions,
        redraw_called: RefCell<usize>,
    }

    impl MockWindow {
        fn new(width: u32, height: u32) -> Self {
            Self {
                dims: WindowDimensions::new(width, height),
                redraw_called: RefCell::new(0),
            }
        }

        fn redraw_call_count(&self) -> usize {
            *self.redraw_called.borrow()
        }
    }

    impl WindowContext for MockWindow {
        fn dimensions(&self) -> WindowDimensions {
            self.dims
        }

        fn request_redraw(&self) {
            *self.redraw_called.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_window_context_dimensions() {
        let window = MockWindow::new(1920, 1080);
        assert_eq!(window.dimensions(), WindowDimensions::new(1920, 1080));
    }

    #[test]
    fn test_window_context_redraw() {
        let window = MockWindow::new(800, 600);

        assert_eq!(window.redraw_call_count(), 0);

        window.request_redraw();
        assert_eq!(window.redraw_call_count(), 1);

        window.request_redraw();
        window.request_redraw();
        assert_eq!(window.redraw_call_count(), 3);
    }

    #[test]
    fn test_window_context_as_trait_object() {
        let window = MockWindow::new(640, 480);
        let context: &dyn WindowContext = &window;
        context.request_redraw();
        assert_eq!(context.dimensions().aspect(), 640.0 / 480.0);
        assert_eq!(window.redraw_call_count(), 1);
    }
}
