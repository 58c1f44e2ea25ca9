use crate::model::item::{Category, ItemType, VisualDefect};

pub struct ItemTemplate {
    pub name: &'static str,
    pub category: Category,
    pub item_type: ItemType,
    pub material: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}

const fn t(
    name: &'static str,
    category: Category,
    item_type: ItemType,
    material: &'static str,
    description: &'static str,
    color: &'static str,
) -> ItemTemplate {
    ItemTemplate {
        name,
        category,
        item_type,
        material,
        description,
        color,
    }
}

use Category::{Female, Male};
use ItemType::{Bag, ClothingDress, ClothingTop, Electronics, Shoe};

pub const TEMPLATES: &[ItemTemplate] = &[
    // Tops
    t("Cotton T-Shirt", Female, ClothingTop, "100% cotton", "Soft, breathable summer basic.", "#FECACA"),
    t("Denim Jacket", Female, ClothingTop, "Denim", "Vintage stone wash, built to last.", "#60A5FA"),
    t("Wool Cardigan", Female, ClothingTop, "Merino wool", "Gentle, warm and cozy.", "#FDE68A"),
    t("Silk Blouse", Female, ClothingTop, "Mulberry silk", "French elegance with a rich sheen.", "#E5E7EB"),
    t("Sports Hoodie", Male, ClothingTop, "Polyester", "Wicks sweat, a gym essential.", "#1F2937"),
    t("Business Shirt", Male, ClothingTop, "Long-staple cotton", "Non-iron finish for the office.", "#BFDBFE"),
    t("Shell Jacket", Male, ClothingTop, "Gore-Tex", "Wind and waterproof for rough weather.", "#059669"),
    // Dresses
    t("Floral Dress", Female, ClothingDress, "Chiffon", "Fresh countryside look for holidays.", "#FBCFE8"),
    t("Evening Gown", Female, ClothingDress, "Velvet", "Graceful statement piece for the gala.", "#818CF8"),
    t("Slip Maxi Dress", Female, ClothingDress, "Modal", "Fluid drape, slimming cut.", "#F87171"),
    t("Little Black Dress", Female, ClothingDress, "Acetate", "Timeless retro classic.", "#111827"),
    // Shoes
    t("Running Shoes", Male, Shoe, "Breathable mesh", "Featherweight cushioning for every stride.", "#3B82F6"),
    t("Skate Sneakers", Male, Shoe, "Synthetic leather", "Street style that goes with anything.", "#D1D5DB"),
    t("High Heels", Female, Shoe, "Patent leather", "7cm heel that lengthens the leg.", "#DC2626"),
    t("Chunky Sneakers", Female, Shoe, "Mixed materials", "Retro platform sole.", "#FEF3C7"),
    // Electronics
    t("Wireless Mouse", Male, Electronics, "Matte plastic", "Ergonomic shape, silent clicks.", "#374151"),
    t("Bluetooth Earbuds", Male, Electronics, "Glossy PC", "Active noise cancelling, immersive sound.", "#F3F4F6"),
    t("Smartphone", Female, Electronics, "Glass back", "Ultra-clear camera, blazing performance.", "#A78BFA"),
    t("Laptop", Male, Electronics, "Aluminium", "Thin and light with 12 hours of battery.", "#9CA3AF"),
    t("Tablet", Female, Electronics, "Recycled aluminium", "Retina display, serious productivity.", "#FCD34D"),
    t("Smartwatch", Male, Electronics, "Fluoroelastomer", "All-day heart rate and workout modes.", "#EF4444"),
    // Bags
    t("Backpack", Male, Bag, "Oxford cloth", "Roomy and splash-proof for commuting.", "#4B5563"),
    t("Leather Tote", Female, Bag, "Pebbled cowhide", "Huge capacity, clean lines.", "#D97706"),
    t("Chain Bag", Female, Bag, "Lambskin", "Quilted design, a fashion staple.", "#1F2937"),
    t("Sport Waist Pack", Male, Bag, "Nylon", "Light and close-fitting, hands free.", "#10B981"),
];

pub const PASSED_EXPLANATIONS: &[&str] = &[
    "Item is intact and meets the return policy.",
    "Inspection passed: brand new and genuine.",
    "Packaging complete, no flaws, even smells new.",
    "All tags present and uncut.",
    "Every accessory included, works as expected.",
];

const STAIN: &[&str] = &[
    "Obvious foundation smear on the collar.",
    "Coffee stain on the cuff.",
    "Greasy mark on the surface.",
    "Mud traces on the bottom.",
];

const TEAR: &[&str] = &[
    "Seam has split under the arm.",
    "A gash cut through the fabric.",
    "Worn-through hole at the bottom.",
    "Torn next to the zipper.",
];

const BROKEN_TAG: &[&str] = &[
    "Security tag was forced off.",
    "Tag was re-attached, original thread is missing.",
    "Tag is missing.",
    "No-questions returns require the tag intact.",
];

const MISSING_COMPONENT: &[&str] = &[
    "Charging cable missing from the box.",
    "One shoelace is missing.",
    "Manual and warranty card are gone.",
    "A key accessory is missing.",
];

const BROKEN_SEAL: &[&str] = &[
    "Single-use seal has been torn open.",
    "Seal sticker shows signs of re-gluing.",
    "Box has clearly been opened.",
    "Tamper-evident label is broken.",
];

pub const GENERIC_DEFECT_EXPLANATION: &str =
    "Item has a serious flaw and cannot be restocked.";

pub fn defect_explanations(defect: VisualDefect) -> &'static [&'static str] {
    match defect {
        VisualDefect::Stain => STAIN,
        VisualDefect::Tear => TEAR,
        VisualDefect::BrokenTag => BROKEN_TAG,
        VisualDefect::MissingComponent => MISSING_COMPONENT,
        VisualDefect::BrokenSeal => BROKEN_SEAL,
        VisualDefect::None => PASSED_EXPLANATIONS,
    }
}

/// Names the remote source is asked to choose from.
pub fn template_names() -> Vec<&'static str> {
    TEMPLATES.iter().map(|t| t.name).collect()
}
