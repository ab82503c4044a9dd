//! Product catalog
//!
//! Subscription products with their plans and static checkout links

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Product family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductKind {
    /// Automated trading robot
    Robot,
    /// Copy-trading portfolio
    CopyTrading,
    /// Proprietary-desk evaluation bundled with strategies
    PropDeskCombo,
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProductKind::Robot => "robot",
            ProductKind::CopyTrading => "copy-trading",
            ProductKind::PropDeskCombo => "prop-desk-combo",
        };
        f.write_str(s)
    }
}

/// A purchasable plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    /// Monthly price in BRL
    pub monthly_price: Decimal,
    /// Payment provider checkout page
    pub checkout_url: String,
}

/// A product offered on the site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub slug: String,
    pub name: String,
    pub kind: ProductKind,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub plans: Vec<Plan>,
}

impl Product {
    pub fn plan(&self, name: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Lowest monthly price across plans
    pub fn starting_price(&self) -> Option<Decimal> {
        self.plans.iter().map(|p| p.monthly_price).min()
    }
}

/// Lookup over the configured products
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog; an empty list falls back to the built-in products
    pub fn new(products: Vec<Product>) -> Self {
        if products.is_empty() {
            Self::builtin()
        } else {
            Self { products }
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    pub fn by_kind(&self, kind: ProductKind) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.kind == kind)
    }

    /// Checkout URL for a product plan
    pub fn checkout_link(&self, slug: &str, plan: &str) -> Option<&str> {
        self.product(slug)?
            .plan(plan)
            .map(|p| p.checkout_url.as_str())
    }

    /// Products sold on the site
    pub fn builtin() -> Self {
        fn plan(name: &str, price: Decimal, checkout: &str) -> Plan {
            Plan {
                name: name.to_string(),
                monthly_price: price,
                checkout_url: format!("https://pay.profitestrategista.com.br/checkout/{}", checkout),
            }
        }

        fn features(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            products: vec![
                Product {
                    slug: "robo-mini-indice".to_string(),
                    name: "Robô Mini Índice".to_string(),
                    kind: ProductKind::Robot,
                    features: features(&[
                        "Operações automatizadas no WIN",
                        "Stop e alvo pré-configurados",
                        "Suporte via WhatsApp",
                    ]),
                    plans: vec![
                        plan("mensal", dec!(197), "robo-win-mensal"),
                        plan("anual", dec!(147), "robo-win-anual"),
                    ],
                },
                Product {
                    slug: "robo-mini-dolar".to_string(),
                    name: "Robô Mini Dólar".to_string(),
                    kind: ProductKind::Robot,
                    features: features(&["Operações automatizadas no WDO", "Gestão de risco diária"]),
                    plans: vec![plan("mensal", dec!(197), "robo-wdo-mensal")],
                },
                Product {
                    slug: "copy-trading".to_string(),
                    name: "Carteira Copy Trading".to_string(),
                    kind: ProductKind::CopyTrading,
                    features: features(&[
                        "Espelhamento das operações na sua corretora",
                        "Relatório mensal de desempenho",
                    ]),
                    plans: vec![
                        plan("conservadora", dec!(297), "copy-conservadora"),
                        plan("arrojada", dec!(397), "copy-arrojada"),
                    ],
                },
                Product {
                    slug: "combo-mesa-proprietaria".to_string(),
                    name: "Combo Mesa Proprietária".to_string(),
                    kind: ProductKind::PropDeskCombo,
                    features: features(&[
                        "Avaliação de mesa proprietária inclusa",
                        "Robôs WIN e WDO",
                        "Mentoria em grupo",
                    ]),
                    plans: vec![plan("combo", dec!(497), "combo-mesa")],
                },
            ],
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
