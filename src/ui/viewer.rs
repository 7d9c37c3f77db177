use cgmath::{Rad, Vector2};
use iced::keyboard;
use iced::mouse::{self, Cursor};
use iced::touch;
use iced::widget::canvas::{self, Program};
use iced::{Color, Point, Radians, Rectangle, Renderer, Size, Theme};
use std::time::Instant;

use crate::gesture::{GestureDetector, GestureSettings, PointerEvent, MOUSE_POINTER};
use crate::state::data::Raster;
use crate::state::transform::ViewerTransform;
use crate::Message;

/// Pixels of smooth scrolling that count as one wheel line
const PIXELS_PER_LINE: f32 = 50.0;

/// Full-screen canvas showing one image with its zoom/pan/rotation
pub struct FullScreenViewer<'a> {
    pub raster: &'a Raster,
    pub transform: &'a ViewerTransform,
    pub gestures: GestureSettings,
}

impl Program<Message> for FullScreenViewer<'_> {
    type State = ViewerState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::BLACK);

        let target = image_bounds(self.raster, self.transform, bounds.size());
        let rotation: Rad<f32> = self.transform.rotation.into();
        frame.draw_image(
            target,
            canvas::Image::new(self.raster.handle.clone()).rotation(Radians(rotation.0)),
        );

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        state.detector.set_settings(self.gestures);

        let Some(pointer) = state.pointer_event(event, bounds, cursor) else {
            return (canvas::event::Status::Ignored, None);
        };

        let message = state.detector.handle(pointer).map(Message::Gesture);
        (canvas::event::Status::Captured, message)
    }
}

/// Per-widget input state
#[derive(Debug, Default)]
pub struct ViewerState {
    detector: GestureDetector,
    /// Shift held: the wheel rotates instead of zooming
    rotate_modifier: bool,
}

impl ViewerState {
    /// Translate an iced event into a pointer event in widget coordinates
    fn pointer_event(
        &mut self,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> Option<PointerEvent> {
        let now = Instant::now();

        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                Some(PointerEvent::Pressed {
                    id: MOUSE_POINTER,
                    position: Vector2::new(position.x, position.y),
                    at: now,
                })
            }
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                Some(PointerEvent::Released { id: MOUSE_POINTER, at: now })
            }
            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if self.detector.active_pointers() == 0 {
                    return None;
                }
                Some(PointerEvent::Moved {
                    id: MOUSE_POINTER,
                    position: local(bounds, position),
                })
            }
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let position = cursor.position_in(bounds)?;
                let lines = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y,
                    mouse::ScrollDelta::Pixels { y, .. } => y / PIXELS_PER_LINE,
                };
                Some(PointerEvent::Wheel {
                    position: Vector2::new(position.x, position.y),
                    lines,
                    rotate: self.rotate_modifier,
                })
            }
            canvas::Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                self.rotate_modifier = modifiers.shift();
                None
            }
            canvas::Event::Touch(touch::Event::FingerPressed { id, position }) => {
                Some(PointerEvent::Pressed {
                    id: id.0,
                    position: local(bounds, position),
                    at: now,
                })
            }
            canvas::Event::Touch(touch::Event::FingerMoved { id, position }) => {
                Some(PointerEvent::Moved {
                    id: id.0,
                    position: local(bounds, position),
                })
            }
            canvas::Event::Touch(touch::Event::FingerLifted { id, .. }) => {
                Some(PointerEvent::Released { id: id.0, at: now })
            }
            canvas::Event::Touch(touch::Event::FingerLost { id, .. }) => {
                Some(PointerEvent::Lost { id: id.0 })
            }
            _ => None,
        }
    }
}

fn local(bounds: Rectangle, position: Point) -> Vector2<f32> {
    Vector2::new(position.x - bounds.x, position.y - bounds.y)
}

/// Largest size with the raster's aspect ratio that fits in `available`
pub fn fit_contain(width: u32, height: u32, available: Size) -> Size {
    if width == 0 || height == 0 {
        return Size::ZERO;
    }
    let (w, h) = (width as f32, height as f32);
    let factor = (available.width / w).min(available.height / h);
    Size::new(w * factor, h * factor)
}

/// Where the unrotated image lands: fitted, scaled about the centre, then
/// shifted by the pan offset. Rotation is applied around this rectangle's centre.
pub fn image_bounds(raster: &Raster, transform: &ViewerTransform, available: Size) -> Rectangle {
    let fitted = fit_contain(raster.width, raster.height, available);
    let size = Size::new(fitted.width * transform.scale, fitted.height * transform.scale);
    let center = Point::new(
        available.width / 2.0 + transform.offset.x,
        available.height / 2.0 + transform.offset.y,
    );

    Rectangle::new(
        Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0),
        size,
    )
}
