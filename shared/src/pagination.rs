//! 分页
//!
//! 列表在客户端分页：整页拉取后按 `page_size` 切片，
//! 页码条按固定窗口折叠为省略号。

use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 页码条显示全部页码的上限
const MAX_FULL_PAGES: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// 计算页码条
///
/// - 总页数 ≤ 7：全部显示
/// - 靠近开头：`1 2 3 4 5 … N`
/// - 靠近结尾：`1 … N-4 N-3 N-2 N-1 N`
/// - 中间：`1 … c-1 c c+1 … N`
pub fn page_numbers(current: usize, total: usize) -> Vec<PageItem> {
    use PageItem::*;

    if total == 0 {
        return Vec::new();
    }
    if total <= MAX_FULL_PAGES {
        return (1..=total).map(Page).collect();
    }

    let current = current.clamp(1, total);
    let mut items = Vec::with_capacity(MAX_FULL_PAGES);

    if current <= 4 {
        items.extend((1..=5).map(Page));
        items.push(Ellipsis);
        items.push(Page(total));
    } else if current >= total - 3 {
        items.push(Page(1));
        items.push(Ellipsis);
        items.extend((total - 4..=total).map(Page));
    } else {
        items.push(Page(1));
        items.push(Ellipsis);
        items.extend((current - 1..=current + 1).map(Page));
        items.push(Ellipsis);
        items.push(Page(total));
    }
    items
}

/// 客户端分页状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    /// 从 1 开始
    pub page: usize,
    pub page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// 当前页在 `len` 条数据下的有效页码（数据变少后自动回退）
    pub fn effective_page(&self, len: usize) -> usize {
        self.page.clamp(1, self.total_pages(len).max(1))
    }

    pub fn range(&self, len: usize) -> Range<usize> {
        let start = (self.effective_page(len) - 1) * self.page_size;
        let end = (start + self.page_size).min(len);
        start.min(len)..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }

    pub fn has_prev(&self, len: usize) -> bool {
        self.effective_page(len) > 1
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.effective_page(len) < self.total_pages(len)
    }

    pub fn go_to(&mut self, page: usize, len: usize) {
        self.page = page.clamp(1, self.total_pages(len).max(1));
    }

    /// `"Showing 11–20 of 42"`
    pub fn range_label(&self, len: usize) -> String {
        if len == 0 {
            return "No results".to_string();
        }
        let r = self.range(len);
        format!("Showing {}–{} of {}", r.start + 1, r.end, len)
    }
}

#[cfg(test)]
mod tests {
    use super::PageItem::{Ellipsis as E, Page as P};
    use super::*;

    #[test]
    fn small_totals_show_every_page() {
        assert_eq!(page_numbers(1, 0), Vec::<PageItem>::new());
        assert_eq!(page_numbers(1, 1), vec![P(1)]);
        assert_eq!(page_numbers(3, 7), (1..=7).map(P).collect::<Vec<_>>());
    }

    #[test]
    fn near_start() {
        let expected = vec![P(1), P(2), P(3), P(4), P(5), E, P(20)];
        assert_eq!(page_numbers(1, 20), expected);
        assert_eq!(page_numbers(4, 20), expected);
    }

    #[test]
    fn near_end() {
        let expected = vec![P(1), E, P(16), P(17), P(18), P(19), P(20)];
        assert_eq!(page_numbers(17, 20), expected);
        assert_eq!(page_numbers(20, 20), expected);
    }

    #[test]
    fn middle_window() {
        assert_eq!(
            page_numbers(10, 20),
            vec![P(1), E, P(9), P(10), P(11), E, P(20)]
        );
        assert_eq!(page_numbers(5, 8), vec![P(1), E, P(4), P(5), P(6), P(7), P(8)]);
        assert_eq!(page_numbers(5, 9), vec![P(1), E, P(4), P(5), P(6), E, P(9)]);
    }

    #[test]
    fn out_of_range_current_is_clamped() {
        assert_eq!(page_numbers(0, 20), page_numbers(1, 20));
        assert_eq!(page_numbers(99, 20), page_numbers(20, 20));
    }

    #[test]
    fn paginator_slices_and_labels() {
        let data: Vec<u32> = (1..=23).collect();
        let mut p = Paginator::new(10);
        assert_eq!(p.total_pages(data.len()), 3);
        assert_eq!(p.slice(&data), &data[0..10]);
        assert!(!p.has_prev(data.len()));

        p.go_to(3, data.len());
        assert_eq!(p.slice(&data), &[21, 22, 23]);
        assert_eq!(p.range_label(data.len()), "Showing 21–23 of 23");
        assert!(!p.has_next(data.len()));

        // list shrank underneath the current page
        assert_eq!(p.slice(&data[..5]), &data[..5]);
        assert_eq!(p.range_label(0), "No results");
    }
}
