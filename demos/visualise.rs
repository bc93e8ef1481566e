use grid_astar::{search, Grid, SearchObserver};
use grid_util::point::Point;

// In this demo a path is found on a 10x10 grid with a wall that has a single gap. Every
// expansion is printed, a frame per step, with
// - # marking a barrier
// - S and E marking the start and end
// - o marking the frontier, x visited cells and * the path

struct Printer {
    frame: usize,
}

impl SearchObserver for Printer {
    fn on_step(&mut self, grid: &Grid) {
        self.frame += 1;
        println!("Frame {}:\n{}", self.frame, grid);
    }
}

fn main() {
    let mut grid = Grid::build(10, 800);
    for row in 0..9 {
        grid.set_barrier(Point::new(row, 5)).unwrap();
    }
    grid.set_start(Point::new(0, 0)).unwrap();
    grid.set_end(Point::new(0, 9)).unwrap();
    grid.refresh_all_neighbors();
    println!("{}", grid);

    let start = Point::new(0, 0);
    let end = Point::new(0, 9);
    let mut printer = Printer { frame: 0 };
    match search(&mut grid, start, end, &mut printer) {
        Ok(outcome) => match outcome.path() {
            Some(path) => {
                println!("Path of length {}:", path.len() - 1);
                for p in path {
                    println!("{:?}", p);
                }
            }
            None => println!("{:?}", outcome),
        },
        Err(e) => println!("{}", e),
    }
}
