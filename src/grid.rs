/*!

A toroidal lattice of occupancy cells. Cells hold `PersonId`s only; the population in
`PeopleData` is the sole owner of individuals, and the grid exists purely for spatial lookup.

All coordinates are wrapped with floor modulo, so `(-1, 0)` on a 10x10 grid is the cell
`(9, 0)`.

*/

use crate::context::Context;
use crate::PersonId;
use rustc_hash::FxHashSet;

pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<FxHashSet<PersonId>>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        assert!(
            width > 0 && height > 0,
            "grid dimensions must be positive, got {width}x{height}"
        );
        let cell_count = width as usize * height as usize;
        Grid {
            width,
            height,
            cells: vec![FxHashSet::default(); cell_count],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Wraps arbitrary coordinates onto the lattice.
    #[inline(always)]
    pub fn wrap(&self, x: i32, y: i32) -> (i32, i32) {
        (x.rem_euclid(self.width), y.rem_euclid(self.height))
    }

    #[inline(always)]
    fn cell_index(&self, x: i32, y: i32) -> usize {
        let (x, y) = self.wrap(x, y);
        y as usize * self.width as usize + x as usize
    }

    /// Inserts `person_id` into the wrapped cell. Must not be called twice for the same person
    /// without an intervening `move_individual`.
    pub fn place(&mut self, person_id: PersonId, x: i32, y: i32) {
        let idx = self.cell_index(x, y);
        self.cells[idx].insert(person_id);
    }

    pub fn move_individual(&mut self, person_id: PersonId, old_x: i32, old_y: i32, new_x: i32, new_y: i32) {
        let old_idx = self.cell_index(old_x, old_y);
        let removed = self.cells[old_idx].remove(&person_id);
        debug_assert!(removed, "{person_id:?} was not in cell ({old_x}, {old_y})");

        let new_idx = self.cell_index(new_x, new_y);
        self.cells[new_idx].insert(person_id);
    }

    pub fn individuals_at(&self, x: i32, y: i32) -> &FxHashSet<PersonId> {
        &self.cells[self.cell_index(x, y)]
    }

    /// Total number of ids held across all cells.
    pub fn occupancy(&self) -> usize {
        self.cells.iter().map(FxHashSet::len).sum()
    }
}

pub trait ContextGridExt {
    /// Installs an empty `width` x `height` grid for this run.
    fn init_grid(&mut self, width: i32, height: i32);

    /// Note that this will panic if `init_grid` was not called yet.
    fn grid(&self) -> &Grid;

    fn grid_mut(&mut self) -> &mut Grid;
}

impl ContextGridExt for Context {
    fn init_grid(&mut self, width: i32, height: i32) {
        self.insert_data_container(Grid::new(width, height));
    }

    fn grid(&self) -> &Grid {
        self.get_data_container::<Grid>()
            .expect("You must initialize the grid before using it")
    }

    fn grid_mut(&mut self) -> &mut Grid {
        self.try_get_data_container_mut::<Grid>()
            .expect("You must initialize the grid before using it")
    }
}
