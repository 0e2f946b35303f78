/// Lines above the list: title, input echo, warning
pub const HEADER_LINES: u16 = 3;
/// Lines below the list: page indicator and two help lines
pub const FOOTER_LINES: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub count: usize,
    /// First item on the page
    pub start: usize,
    /// One past the last item on the page
    pub end: usize,
}

pub fn page_capacity(height: u16) -> usize {
    height.saturating_sub(HEADER_LINES + FOOTER_LINES) as usize
}

/// Window of `len` items containing `cursor`, or `None` when no row fits
pub fn page_window(len: usize, cursor: usize, height: u16) -> Option<Page> {
    let capacity = page_capacity(height);
    if capacity < 1 {
        return None;
    }

    let count = len.div_ceil(capacity).max(1);
    let index = (cursor / capacity).min(count - 1);
    let start = index * capacity;
    let end = len.min(start + capacity);

    Some(Page {
        index,
        count,
        start,
        end,
    })
}
