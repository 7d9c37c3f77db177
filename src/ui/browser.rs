use iced::widget::{
    button, column, container, image, mouse_area, pick_list, scrollable, text, Column, Space,
};
use iced::{Alignment, Element, Length, Radians, Rotation};

use crate::state::session::Session;
use crate::Message;

/// Height of the scrollable image list
const LIST_HEIGHT: f32 = 150.0;

/// Folder picker, image list and (when decoded) the rotated preview
pub fn view(session: &Session, preview_rotation: Radians) -> Element<'_, Message> {
    let folder_picker = container(pick_list(
        session.folders().as_slice(),
        Some(session.selected_folder()),
        Message::FolderSelected,
    ))
    .padding([0, 16]);

    let rows = session.image_names().iter().map(|name| {
        let style = if session.selected_image() == Some(name.as_str()) {
            button::secondary
        } else {
            button::text
        };

        button(text(name.as_str()))
            .width(Length::Fill)
            .padding(8)
            .style(style)
            .on_press(Message::ImageSelected(name.clone()))
            .into()
    });

    let image_list = scrollable(Column::with_children(rows))
        .width(Length::Fill)
        .height(Length::Fixed(LIST_HEIGHT));

    let mut content = column![
        Space::with_height(64.0),
        folder_picker,
        Space::with_height(16.0),
        container(image_list).padding([0, 16]),
    ]
    .width(Length::Fill)
    .height(Length::Fill)
    .align_x(Alignment::Center);

    // No raster, no preview area at all
    if let Some(raster) = session.raster() {
        let preview = image(raster.handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .rotation(Rotation::Floating(preview_rotation));

        content = content.push(mouse_area(preview).on_press(Message::PreviewTapped));
    }

    content.into()
}
