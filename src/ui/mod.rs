//! Terminal rendering for the landing screen and its modals

pub mod dialog;
pub mod footer;
pub mod help;
pub mod landing;
pub mod layout;
pub mod wizard_ui;

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::buffer::Buffer;

    /// Flatten a rendered buffer into one string, row by row
    pub fn buffer_text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width.max(1))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
