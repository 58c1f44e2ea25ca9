use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::generator::ItemSource;
use crate::generator::catalog::{
    self, GENERIC_DEFECT_EXPLANATION, ItemTemplate, PASSED_EXPLANATIONS, TEMPLATES,
};
use crate::model::item::{ReturnItem, VisualDefect};

/// Instant, offline item generation from the built-in catalog.
pub struct LocalGenerator {
    rng: SmallRng,
}

impl LocalGenerator {
    pub fn new(rng: SmallRng) -> Self {
        Self { rng }
    }

    pub fn generate_item(&mut self) -> ReturnItem {
        let template = TEMPLATES
            .choose(&mut self.rng)
            .unwrap_or(&TEMPLATES[0]);
        let is_fraud = self.rng.gen_bool(0.5);
        build_item(template, is_fraud, &mut self.rng)
    }
}

fn build_item(template: &ItemTemplate, is_fraud: bool, rng: &mut SmallRng) -> ReturnItem {
    let (defect, explanation) = if is_fraud {
        let defect = template
            .item_type
            .valid_defects()
            .choose(rng)
            .copied()
            .unwrap_or(VisualDefect::Stain);
        let explanation = catalog::defect_explanations(defect)
            .choose(rng)
            .copied()
            .unwrap_or(GENERIC_DEFECT_EXPLANATION);
        (defect, explanation)
    } else {
        let explanation = PASSED_EXPLANATIONS
            .choose(rng)
            .copied()
            .unwrap_or(PASSED_EXPLANATIONS[0]);
        (VisualDefect::None, explanation)
    };

    ReturnItem {
        id: ReturnItem::new_id(),
        name: template.name.to_string(),
        category: template.category,
        item_type: template.item_type,
        material: template.material.to_string(),
        description: template.description.to_string(),
        visual_defects: vec![defect],
        is_fraud,
        color: template.color.to_string(),
        explanation: explanation.to_string(),
    }
}

impl ItemSource for LocalGenerator {
    fn generate(&mut self, _level: u32, count: usize) -> Vec<ReturnItem> {
        (0..count).map(|_| self.generate_item()).collect()
    }
}
