use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 12;
const MAX_DEPTH: usize = 10;

#[derive(Clone, Copy, Debug)]
struct Square {
    center: Vec2,
    half_side: f32,
}

impl Square {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let (min, max) = points.iter().fold(
            (vec2(f32::INFINITY, f32::INFINITY), vec2(f32::NEG_INFINITY, f32::NEG_INFINITY)),
            |(min, max), point| (min.min(*point), max.max(*point)),
        );
        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        let span = (max - min).max(vec2(1.0, 1.0));
        Some(Self {
            center: (min + max) * 0.5,
            half_side: span.max_elem() * 0.5 + 1.0,
        })
    }

    fn contains(self, point: Vec2) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.half_side && offset.y <= self.half_side
    }

    fn quadrant_of(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn quadrant(self, quadrant: usize) -> Self {
        let quarter = self.half_side * 0.5;
        let x = if quadrant & 1 == 0 { -quarter } else { quarter };
        let y = if quadrant & 2 == 0 { -quarter } else { quarter };
        Self {
            center: self.center + vec2(x, y),
            half_side: quarter,
        }
    }
}

/// Barnes-Hut tree over node positions. Cells hold a node count and centroid;
/// leaves keep their node indices for exact pairwise forces.
#[derive(Debug)]
pub(super) struct Quadtree {
    square: Square,
    centroid: Vec2,
    count: usize,
    members: Vec<usize>,
    children: Vec<Quadtree>,
}

impl Quadtree {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let square = Square::enclosing(positions)?;
        Some(Self::cell(square, (0..positions.len()).collect(), positions, 0))
    }

    fn cell(square: Square, members: Vec<usize>, positions: &[Vec2], depth: usize) -> Self {
        let count = members.len();
        let centroid = if count == 0 {
            square.center
        } else {
            members
                .iter()
                .fold(Vec2::ZERO, |sum, &index| sum + positions[index])
                / count as f32
        };

        let mut cell = Self {
            square,
            centroid,
            count,
            members,
            children: Vec::new(),
        };
        if depth >= MAX_DEPTH || count <= LEAF_CAPACITY {
            return cell;
        }

        let mut buckets: [Vec<usize>; 4] = Default::default();
        for &index in &cell.members {
            buckets[square.quadrant_of(positions[index])].push(index);
        }

        cell.children = buckets
            .into_iter()
            .enumerate()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(quadrant, bucket)| Self::cell(square.quadrant(quadrant), bucket, positions, depth + 1))
            .collect();
        cell.members.clear();
        cell
    }

    /// Repulsion felt by `index`, summed exactly inside nearby leaves and
    /// through cell centroids once `side / distance < theta`. Each exact pair
    /// or centroid used adds one to `interactions`.
    pub(super) fn repulsion_on(
        &self,
        index: usize,
        positions: &[Vec2],
        force: impl Fn(usize, usize) -> Vec2 + Copy,
        far_force: impl Fn(Vec2, Vec2, f32) -> Vec2 + Copy,
        theta: f32,
        interactions: &mut usize,
    ) -> Vec2 {
        if self.count == 0 {
            return Vec2::ZERO;
        }

        if self.children.is_empty() {
            *interactions += self.members.len();
            return self
                .members
                .iter()
                .filter(|&&other| other != index)
                .fold(Vec2::ZERO, |sum, &other| sum + force(index, other));
        }

        let point = positions[index];
        let distance = (point - self.centroid).length().max(0.01);
        if self.count > 1
            && !self.square.contains(point)
            && self.square.half_side * 2.0 / distance < theta
        {
            *interactions += 1;
            return far_force(point, self.centroid, self.count as f32);
        }

        self.children
            .iter()
            .fold(Vec2::ZERO, |sum, child| {
                sum + child.repulsion_on(index, positions, force, far_force, theta, interactions)
            })
    }
}
