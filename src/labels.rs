//! Built-in label catalogs for MT799 narratives.
//!
//! Four classification axes share one [`LabelCatalog`], built once at start
//! and handed to the analyzer. Label identifiers are the same in every
//! language; only the hypothesis phrasing changes, so a multilingual NLI
//! model can be prompted in the narrative's own language.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::LabelSet;

/// Language of the hypothesis templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelLanguage {
    #[default]
    #[serde(alias = "english")]
    En,
    #[serde(alias = "french")]
    Fr,
}

/// The four label sets used by one analysis.
#[derive(Debug, Clone)]
pub struct LabelCatalog {
    pub main_operation: Arc<LabelSet>,
    pub condition: Arc<LabelSet>,
    pub time_constraint: Arc<LabelSet>,
    pub sub_task: Arc<LabelSet>,
}

impl Default for LabelCatalog {
    fn default() -> Self {
        Self::english()
    }
}

impl LabelCatalog {
    /// Assemble a catalog from custom label sets.
    pub fn new(
        main_operation: LabelSet,
        condition: LabelSet,
        time_constraint: LabelSet,
        sub_task: LabelSet,
    ) -> Self {
        Self {
            main_operation: Arc::new(main_operation),
            condition: Arc::new(condition),
            time_constraint: Arc::new(time_constraint),
            sub_task: Arc::new(sub_task),
        }
    }

    /// Catalog for the given hypothesis language.
    pub fn for_language(language: LabelLanguage) -> Self {
        match language {
            LabelLanguage::En => Self::english(),
            LabelLanguage::Fr => Self::french(),
        }
    }

    /// English hypotheses.
    pub fn english() -> Self {
        Self::new(
            LabelSet::from_static(
                "main_operation",
                &[
                    (
                        "extend_or_pay",
                        "This message requests either an extension or a payment depending on conditions",
                    ),
                    ("extend", "This message only requests an extension"),
                    ("pay", "This message only requests a payment"),
                    ("modify", "This message requests a modification of the terms"),
                    ("info", "This message requests information"),
                ],
            ),
            LabelSet::from_static(
                "condition",
                &[
                    (
                        "conditional_payment",
                        "The message contains a payment condition that depends on other factors",
                    ),
                    (
                        "conditional_extension",
                        "The message contains an extension condition that depends on other factors",
                    ),
                    (
                        "alternative_action",
                        "The message proposes alternative actions depending on certain conditions",
                    ),
                    ("deadline_dependent", "The requested action depends on a deadline"),
                ],
            ),
            LabelSet::from_static(
                "time_constraint",
                &[
                    ("specific_date", "The message mentions a specific date for the action"),
                    (
                        "relative_date",
                        "The message mentions a relative delay (for example, within X days)",
                    ),
                    ("deadline", "The message mentions a deadline"),
                    ("conditional_date", "The mentioned date depends on a condition"),
                ],
            ),
            LabelSet::from_static(
                "sub_task",
                &[
                    ("extension_request", "This part requests an extension"),
                    ("payment_instruction", "This part gives payment instructions"),
                    ("condition_statement", "This part defines a condition"),
                    ("deadline_specification", "This part specifies a delay or a deadline"),
                    (
                        "fallback_action",
                        "This part describes the action to take if the main conditions are not met",
                    ),
                ],
            ),
        )
    }

    /// French hypotheses.
    pub fn french() -> Self {
        Self::new(
            LabelSet::from_static(
                "main_operation",
                &[
                    (
                        "extend_or_pay",
                        "Ce message demande soit une prorogation, soit un paiement en fonction de conditions",
                    ),
                    ("extend", "Ce message demande uniquement une prorogation"),
                    ("pay", "Ce message demande uniquement un paiement"),
                    ("modify", "Ce message demande une modification des conditions"),
                    ("info", "Ce message demande des informations"),
                ],
            ),
            LabelSet::from_static(
                "condition",
                &[
                    (
                        "conditional_payment",
                        "Le message contient une condition de paiement dépendant d'autres facteurs",
                    ),
                    (
                        "conditional_extension",
                        "Le message contient une condition de prorogation dépendant d'autres facteurs",
                    ),
                    (
                        "alternative_action",
                        "Le message propose des actions alternatives selon certaines conditions",
                    ),
                    ("deadline_dependent", "L'action demandée dépend d'une date limite"),
                ],
            ),
            LabelSet::from_static(
                "time_constraint",
                &[
                    ("specific_date", "Le message mentionne une date spécifique pour l'action"),
                    (
                        "relative_date",
                        "Le message mentionne un délai relatif (par exemple, dans X jours)",
                    ),
                    ("deadline", "Le message mentionne une date limite"),
                    ("conditional_date", "La date mentionnée dépend d'une condition"),
                ],
            ),
            LabelSet::from_static(
                "sub_task",
                &[
                    ("extension_request", "Cette partie demande une prorogation"),
                    ("payment_instruction", "Cette partie donne des instructions de paiement"),
                    ("condition_statement", "Cette partie définit une condition"),
                    (
                        "deadline_specification",
                        "Cette partie spécifie un délai ou une date limite",
                    ),
                    (
                        "fallback_action",
                        "Cette partie décrit l'action à prendre en cas de non-respect des conditions principales",
                    ),
                ],
            ),
        )
    }

    /// All four sets, in pass order.
    pub fn sets(&self) -> [&LabelSet; 4] {
        [
            &self.main_operation,
            &self.condition,
            &self.time_constraint,
            &self.sub_task,
        ]
    }
}
