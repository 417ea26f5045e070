use anyhow::Error;
use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Rectangle spanning the given percentage of `area`, centered on both axes.
/// The modal dialogs draw inside it.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [middle] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(middle);
    popup
}

/// Root cause of a chained error, compact enough for the footer status line.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map_or_else(|| err.to_string(), |cause| cause.to_string())
}
