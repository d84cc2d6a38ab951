use crate::constants::{ARRIVE_EPSILON, SNAP_EPSILON};
use crate::types::{Direction, Vec2};

#[derive(Clone, Debug)]
pub struct Body {
    pub tile: Vec2,
    pub fx: f32,
    pub fy: f32,
    pub dir: Direction,
}

impl Body {
    pub fn at(tile: Vec2, dir: Direction) -> Self {
        Self {
            tile,
            fx: tile.x as f32,
            fy: tile.y as f32,
            dir,
        }
    }

    pub fn place(&mut self, tile: Vec2) {
        self.tile = tile;
        self.fx = tile.x as f32;
        self.fy = tile.y as f32;
    }

    pub fn settle(&mut self, step: f32) {
        let (tx, ty) = (self.tile.x as f32, self.tile.y as f32);
        if !approach(&mut self.fx, &mut self.fy, tx, ty, step) {
            self.fx = tx;
            self.fy = ty;
        }
    }

    pub fn glide_to(&mut self, target: Vec2, step: f32) -> bool {
        let (tx, ty) = (target.x as f32, target.y as f32);
        approach(&mut self.fx, &mut self.fy, tx, ty, step);
        if (self.fx - tx).abs() < ARRIVE_EPSILON && (self.fy - ty).abs() < ARRIVE_EPSILON {
            self.place(target);
            return true;
        }
        false
    }

    pub fn render_lag(&self) -> f32 {
        (self.tile.x as f32 - self.fx).hypot(self.tile.y as f32 - self.fy)
    }
}

fn approach(fx: &mut f32, fy: &mut f32, tx: f32, ty: f32, step: f32) -> bool {
    let dx = tx - *fx;
    let dy = ty - *fy;
    let dist = dx.hypot(dy);
    if dist <= SNAP_EPSILON {
        return false;
    }
    let travel = step.min(dist);
    *fx += dx / dist * travel;
    *fy += dy / dist * travel;
    true
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::constants::{GHOST_STEP, PLAYER_STEP};

    #[test]
    fn settle_snaps_exactly_onto_tile() {
        let mut body = Body::at(Vec2::new(0, 0), Direction::None);
        body.tile = Vec2::new(1, 0);
        let mut ticks = 0;
        while body.fx != 1.0 || body.fy != 0.0 {
            body.settle(GHOST_STEP);
            assert!(body.fx <= 1.0 + 1e-5);
            ticks += 1;
            assert!(ticks <= 10);
        }
        assert_eq!(body.render_lag(), 0.0);
    }

    #[test]
    fn glide_commits_tile_on_arrival() {
        let mut body = Body::at(Vec2::new(2, 2), Direction::Right);
        let target = Vec2::new(3, 2);
        let mut committed = false;
        for _ in 0..10 {
            if body.glide_to(target, PLAYER_STEP) {
                committed = true;
                break;
            }
            assert_eq!(body.tile, Vec2::new(2, 2));
        }
        assert!(committed);
        assert_eq!(body.tile, target);
        assert_eq!((body.fx, body.fy), (3.0, 2.0));
    }

    proptest! {
        #[test]
        fn settle_converges_without_overshoot(
            dx in -1i32..=1,
            dy in -1i32..=1,
            step in 0.05f32..0.9,
        ) {
            let mut body = Body::at(Vec2::new(5, 5), Direction::None);
            body.tile = Vec2::new(5 + dx, 5 + dy);
            let bound = (2.0 / step).ceil() as usize + 1;
            let mut previous = body.render_lag();
            for _ in 0..bound {
                body.settle(step);
                let lag = body.render_lag();
                prop_assert!(lag <= previous + 1e-5);
                previous = lag;
            }
            prop_assert_eq!(body.render_lag(), 0.0);
        }
    }
}
