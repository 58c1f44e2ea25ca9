//! Renderer-agnostic layout of an item card: where each defect marker sits,
//! and the noise specks that make later levels harder to read. Coordinates
//! are percentages of the card's width and height.

use rand::Rng;

use crate::model::item::{ItemType, ReturnItem, VisualDefect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub top: u8,
    pub left: u8,
}

impl Anchor {
    const fn at(top: u8, left: u8) -> Self {
        Self { top, left }
    }

    fn shifted(self, dx: i8, dy: i8) -> Self {
        let shift = |v: u8, d: i8| (v as i16 + d as i16).clamp(0, 100) as u8;
        Self {
            top: shift(self.top, dy),
            left: shift(self.left, dx),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Distractor {
    pub top: u8,
    pub left: u8,
    pub dark: bool,
}

/// Where a defect shows up on a given kind of item.
pub fn defect_anchor(item_type: ItemType, defect: VisualDefect) -> Anchor {
    use VisualDefect::*;

    match (item_type, defect) {
        (ItemType::ClothingTop | ItemType::ClothingDress, Stain) => Anchor::at(40, 35),
        (ItemType::ClothingTop | ItemType::ClothingDress, Tear) => Anchor::at(70, 20),
        (ItemType::ClothingTop | ItemType::ClothingDress, BrokenTag) => Anchor::at(5, 80),
        (ItemType::Shoe, Stain) => Anchor::at(60, 30),
        (ItemType::Shoe, Tear) => Anchor::at(40, 60),
        (ItemType::Shoe, BrokenTag) => Anchor::at(10, 70),
        (ItemType::Shoe, MissingComponent) => Anchor::at(20, 20),
        (ItemType::Electronics, BrokenSeal) => Anchor::at(45, 85),
        (ItemType::Electronics, MissingComponent) => Anchor::at(80, 10),
        (ItemType::Electronics, Stain) => Anchor::at(30, 20),
        (ItemType::Bag, Stain) => Anchor::at(60, 30),
        (ItemType::Bag, Tear) => Anchor::at(75, 65),
        (ItemType::Bag, BrokenTag) => Anchor::at(15, 75),
        (ItemType::Bag, MissingComponent) => Anchor::at(40, 50),
        _ => Anchor::at(50, 50),
    }
}

/// Per-item offset in [-5, 4] so the same defect doesn't land on the
/// exact same spot every time. Stable for a given id.
pub fn jitter(id: &str) -> (i8, i8) {
    let first = id.chars().next().map_or(0, |c| c as u32);
    let last = id.chars().last().map_or(0, |c| c as u32);
    let seed = first + last;
    let dx = (seed % 10) as i8 - 5;
    let dy = ((seed * 2) % 10) as i8 - 5;
    (dx, dy)
}

/// Marker positions for every real defect on the item.
pub fn defect_markers(item: &ReturnItem) -> Vec<(VisualDefect, Anchor)> {
    let (dx, dy) = jitter(&item.id);
    item.defects()
        .map(|d| (d, defect_anchor(item.item_type, d).shifted(dx, dy)))
        .collect()
}

/// Up to five noise specks from level 4 on.
pub fn distractors<R: Rng>(level: u32, rng: &mut R) -> Vec<Distractor> {
    if level <= 3 {
        return Vec::new();
    }
    let count = (rng.gen_range(0..level - 2) + 1).min(5);
    (0..count)
        .map(|_| Distractor {
            top: rng.gen_range(10..90),
            left: rng.gen_range(10..90),
            dark: rng.gen_bool(0.5),
        })
        .collect()
}

/// A presentation backend that can paint an item card.
pub trait ItemRenderer {
    fn draw_base(&mut self, item: &ReturnItem);
    fn draw_defect(&mut self, defect: VisualDefect, anchor: Anchor);
    fn draw_distractor(&mut self, distractor: &Distractor);
}

pub fn render_item<R: ItemRenderer>(renderer: &mut R, item: &ReturnItem, noise: &[Distractor]) {
    renderer.draw_base(item);
    for (defect, anchor) in defect_markers(item) {
        renderer.draw_defect(defect, anchor);
    }
    for d in noise {
        renderer.draw_distractor(d);
    }
}
