use std::num::NonZeroUsize;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Paginator {
    page_size: NonZeroUsize,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub number: usize,
    pub total_pages: usize,
    pub items: &'a [T],
}

impl Paginator {
    pub const fn new(page_size: NonZeroUsize) -> Self {
        Self { page_size }
    }

    pub const fn page_size(self) -> usize {
        self.page_size.get()
    }

    pub const fn total_pages(self, len: usize) -> usize {
        len.div_ceil(self.page_size.get())
    }

    /// Clamps a requested page into range. Never wraps.
    pub fn clamp(self, requested: i64, len: usize) -> usize {
        let last = self.total_pages(len).saturating_sub(1);
        usize::try_from(requested).map_or(0, |requested| requested.min(last))
    }

    pub fn page<T>(self, items: &[T], requested: i64) -> Page<'_, T> {
        let number = self.clamp(requested, items.len());
        let start = (number * self.page_size()).min(items.len());
        let end = (start + self.page_size()).min(items.len());

        Page {
            number,
            total_pages: self.total_pages(items.len()),
            items: &items[start..end],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginator(size: usize) -> Paginator {
        Paginator::new(NonZeroUsize::new(size).unwrap())
    }

    #[test]
    fn thirty_seven_prefixes_in_pages_of_fifteen() {
        let items: Vec<usize> = (0..37).collect();
        let p = paginator(15);

        assert_eq!(p.total_pages(items.len()), 3);

        let last = p.page(&items, 2);
        assert_eq!(last.number, 2);
        assert_eq!(last.items, (30..37).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn out_of_range_requests_clamp() {
        let items: Vec<usize> = (0..37).collect();
        let p = paginator(15);

        assert_eq!(p.page(&items, -1).number, 0);
        assert_eq!(p.page(&items, -1).items[0], 0);
        assert_eq!(p.page(&items, 3).number, 2);
        assert_eq!(p.page(&items, i64::MAX).number, 2);
    }

    #[test]
    fn empty_list_has_no_pages() {
        let items: Vec<usize> = Vec::new();
        let page = paginator(15).page(&items, 4);
        assert_eq!(page.number, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }
}
