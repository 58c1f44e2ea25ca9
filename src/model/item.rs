use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Female,
    Male,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    ClothingTop,
    ClothingDress,
    Shoe,
    Electronics,
    Bag,
}

impl ItemType {
    pub const ALL: [ItemType; 5] = [
        ItemType::ClothingTop,
        ItemType::ClothingDress,
        ItemType::Shoe,
        ItemType::Electronics,
        ItemType::Bag,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::ClothingTop => "clothing_top",
            ItemType::ClothingDress => "clothing_dress",
            ItemType::Shoe => "shoe",
            ItemType::Electronics => "electronics",
            ItemType::Bag => "bag",
        }
    }

    /// Defects the local generator may assign to this kind of item.
    pub fn valid_defects(self) -> &'static [VisualDefect] {
        match self {
            ItemType::ClothingTop | ItemType::ClothingDress | ItemType::Bag => &[
                VisualDefect::Stain,
                VisualDefect::Tear,
                VisualDefect::BrokenTag,
            ],
            ItemType::Shoe => &[
                VisualDefect::Stain,
                VisualDefect::MissingComponent,
                VisualDefect::BrokenTag,
            ],
            ItemType::Electronics => &[
                VisualDefect::BrokenSeal,
                VisualDefect::MissingComponent,
                VisualDefect::Stain,
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualDefect {
    Stain,
    Tear,
    BrokenTag,
    MissingComponent,
    BrokenSeal,
    None,
}

impl VisualDefect {
    pub fn as_str(self) -> &'static str {
        match self {
            VisualDefect::Stain => "stain",
            VisualDefect::Tear => "tear",
            VisualDefect::BrokenTag => "broken_tag",
            VisualDefect::MissingComponent => "missing_component",
            VisualDefect::BrokenSeal => "broken_seal",
            VisualDefect::None => "none",
        }
    }

    pub fn is_defect(self) -> bool {
        self != VisualDefect::None
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub item_type: ItemType,
    pub material: String,
    pub description: String,
    pub visual_defects: Vec<VisualDefect>,
    pub is_fraud: bool,
    pub color: String,
    pub explanation: String,
}

impl ReturnItem {
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn has_defect(&self, defect: VisualDefect) -> bool {
        self.visual_defects.contains(&defect)
    }

    /// Real defects on the item, `none` excluded.
    pub fn defects(&self) -> impl Iterator<Item = VisualDefect> + '_ {
        self.visual_defects.iter().copied().filter(|d| d.is_defect())
    }

    /// `is_fraud` agrees with the defect list, and a clean item carries
    /// exactly `[none]`.
    pub fn is_consistent(&self) -> bool {
        if self.visual_defects.is_empty() {
            return false;
        }
        let any_defect = self.defects().next().is_some();
        let has_none = self.has_defect(VisualDefect::None);
        if self.is_fraud {
            any_defect && !has_none
        } else {
            self.visual_defects == [VisualDefect::None]
        }
    }

    /// Every real defect is one this item type can show.
    pub fn fits_type(&self) -> bool {
        let valid = self.item_type.valid_defects();
        self.defects().all(|d| valid.contains(&d))
    }

    /// Bring the item in line with `is_consistent`, treating the defect list
    /// as ground truth. Returns true when anything changed.
    pub fn repair(&mut self) -> bool {
        let before = (self.visual_defects.clone(), self.is_fraud);

        let mut defects: Vec<VisualDefect> = Vec::with_capacity(self.visual_defects.len());
        for d in self.defects() {
            if !defects.contains(&d) {
                defects.push(d);
            }
        }
        if defects.is_empty() {
            defects.push(VisualDefect::None);
        }
        self.is_fraud = defects.iter().any(|d| d.is_defect());
        self.visual_defects = defects;

        before != (self.visual_defects.clone(), self.is_fraud)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn item(defects: &[VisualDefect], is_fraud: bool) -> ReturnItem {
        ReturnItem {
            id: ReturnItem::new_id(),
            name: "Denim Jacket".to_string(),
            category: Category::Female,
            item_type: ItemType::ClothingTop,
            material: "Denim".to_string(),
            description: "Stone-washed classic.".to_string(),
            visual_defects: defects.to_vec(),
            is_fraud,
            color: "#60A5FA".to_string(),
            explanation: "Checked.".to_string(),
        }
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let it = item(&[VisualDefect::BrokenTag], true);
        let json = serde_json::to_value(&it).unwrap();
        assert_eq!(json["itemType"], "clothing_top");
        assert_eq!(json["visualDefects"][0], "broken_tag");
        assert_eq!(json["isFraud"], true);
        assert_eq!(json["category"], "female");
    }

    #[test]
    fn consistency_rules() {
        assert!(item(&[VisualDefect::None], false).is_consistent());
        assert!(item(&[VisualDefect::Stain], true).is_consistent());
        assert!(item(&[VisualDefect::Stain, VisualDefect::Tear], true).is_consistent());
        assert!(!item(&[VisualDefect::None], true).is_consistent());
        assert!(!item(&[VisualDefect::Stain], false).is_consistent());
        assert!(!item(&[], false).is_consistent());
        assert!(!item(&[VisualDefect::Stain, VisualDefect::None], true).is_consistent());
    }

    #[test]
    fn repair_trusts_defect_list() {
        let mut it = item(&[VisualDefect::Tear, VisualDefect::None, VisualDefect::Tear], false);
        assert!(it.repair());
        assert_eq!(it.visual_defects, vec![VisualDefect::Tear]);
        assert!(it.is_fraud);

        let mut empty = item(&[], true);
        assert!(empty.repair());
        assert_eq!(empty.visual_defects, vec![VisualDefect::None]);
        assert!(!empty.is_fraud);

        let mut fine = item(&[VisualDefect::None], false);
        assert!(!fine.repair());
    }

    #[test]
    fn electronics_never_torn() {
        assert!(!ItemType::Electronics.valid_defects().contains(&VisualDefect::Tear));
        for t in ItemType::ALL {
            assert!(!t.valid_defects().contains(&VisualDefect::None));
        }
    }

    #[test]
    fn fits_type_checks_the_subset() {
        assert!(item(&[VisualDefect::Tear], true).fits_type());
        assert!(item(&[VisualDefect::None], false).fits_type());

        let mut laptop = item(&[VisualDefect::Tear], true);
        laptop.item_type = ItemType::Electronics;
        assert!(!laptop.fits_type());
        laptop.visual_defects = vec![VisualDefect::BrokenSeal];
        assert!(laptop.fits_type());
    }
}
