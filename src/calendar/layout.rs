use super::window::{DAYS_IN_WEEK, PAGE_SIZE};

/// Number of rows of dates on each page
pub(crate) const ROWS_PER_PAGE: usize = 2;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct Size {
    pub(crate) width: usize,
    pub(crate) height: usize,
}

impl Size {
    pub(crate) fn new(width: usize, height: usize) -> Size {
        Size { width, height }
    }
}

/// A rectangle in content coordinates, where pages are laid out side by side
/// from left to right
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct Region {
    pub(crate) x: usize,
    pub(crate) y: usize,
    pub(crate) width: usize,
    pub(crate) height: usize,
}

impl Region {
    pub(crate) fn new(x: usize, y: usize, width: usize, height: usize) -> Region {
        Region {
            x,
            y,
            width,
            height,
        }
    }

    fn right(&self) -> usize {
        self.x.saturating_add(self.width)
    }

    fn bottom(&self) -> usize {
        self.y.saturating_add(self.height)
    }

    // Empty regions intersect nothing
    pub(crate) fn intersects(&self, other: &Region) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct GridPosition {
    pub(crate) page: usize,
    pub(crate) row: usize,
    pub(crate) column: usize,
}

pub(crate) fn grid_position(index: usize) -> GridPosition {
    let index_in_page = index % PAGE_SIZE;
    GridPosition {
        page: index / PAGE_SIZE,
        row: index_in_page / DAYS_IN_WEEK,
        column: index_in_page % DAYS_IN_WEEK,
    }
}

/// Frames of every item in a horizontally paged grid of seven columns and two
/// rows per page.  A layout is only valid for the item count and viewport it
/// was prepared with; any change to either requires preparing a new one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PagedLayout {
    viewport: Size,
    item_count: usize,
    pages: usize,
    cell: Size,
    frames: Vec<Region>,
}

impl PagedLayout {
    pub(crate) fn prepare(item_count: usize, viewport: Size) -> PagedLayout {
        // The page count determines the content size, so it's computed before
        // any frames.
        let pages = item_count / PAGE_SIZE;
        let cell = Size::new(
            viewport.width / DAYS_IN_WEEK,
            viewport.height / ROWS_PER_PAGE,
        );
        let frames = (0..item_count)
            .map(|i| {
                let pos = grid_position(i);
                Region::new(
                    pos.page * viewport.width + pos.column * cell.width,
                    pos.row * cell.height,
                    cell.width,
                    cell.height,
                )
            })
            .collect();
        PagedLayout {
            viewport,
            item_count,
            pages,
            cell,
            frames,
        }
    }

    pub(crate) fn is_valid_for(&self, item_count: usize, viewport: Size) -> bool {
        self.item_count == item_count && self.viewport == viewport
    }

    pub(crate) fn pages(&self) -> usize {
        self.pages
    }

    pub(crate) fn cell_size(&self) -> Size {
        self.cell
    }

    pub(crate) fn content_size(&self) -> Size {
        Size::new(self.viewport.width * self.pages, self.viewport.height)
    }

    /// The region of content coordinates shown when scrolled to `page`
    pub(crate) fn page_region(&self, page: usize) -> Region {
        Region::new(
            page * self.viewport.width,
            0,
            self.viewport.width,
            self.viewport.height,
        )
    }

    pub(crate) fn frame(&self, index: usize) -> Option<Region> {
        self.frames.get(index).copied()
    }

    /// Returns the indices and frames of all items whose frames intersect
    /// `region`, in index order
    pub(crate) fn items_in(&self, region: Region) -> impl Iterator<Item = (usize, Region)> + '_ {
        self.frames
            .iter()
            .copied()
            .enumerate()
            .filter(move |(_, frame)| frame.intersects(&region))
    }
}
