//! Sample catalog data and the generator behind the reseed job.
//!
//! The base templates, store labels, and category labels are the fixed seed
//! data of the product database. Generation cycles the templates so coverage
//! is even for any count, perturbs each price within ±20%, and assigns each
//! record to a uniformly random store.

use rand::Rng;
use rust_decimal::Decimal;

use crate::product::ProductRecord;

/// One entry of the base catalog: display name, list price in whole pesos,
/// and the category the product ships under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductTemplate {
    pub name: &'static str,
    pub base_price: i64,
    pub category: &'static str,
}

const fn template(name: &'static str, base_price: i64, category: &'static str) -> ProductTemplate {
    ProductTemplate {
        name,
        base_price,
        category,
    }
}

/// Retailers a generated record can be assigned to.
pub const STORES: &[&str] = &[
    "Supermercado A",
    "Supermercado B",
    "Supermercado C",
    "Tienda D",
    "Hipermercado E",
];

/// Product categories carried by the catalog.
pub const CATEGORIES: &[&str] = &[
    "Bebidas",
    "Cocina",
    "Limpieza",
    "Cuidado Personal",
    "Snacks",
    "Lácteos",
    "Panadería",
    "Congelados",
];

/// Base products the generator varies. Order matters: record `i` always uses
/// template `i % BASE_TEMPLATES.len()`.
pub const BASE_TEMPLATES: &[ProductTemplate] = &[
    template("Leche Entera 1L", 900, "Lácteos"),
    template("Yogur Natural 500g", 600, "Lácteos"),
    template("Pan Lactal 500g", 450, "Panadería"),
    template("Arroz Integral 1kg", 800, "Cocina"),
    template("Aceite de Oliva 500ml", 1200, "Cocina"),
    template("Detergente Líquido 1L", 700, "Limpieza"),
    template("Shampoo 400ml", 850, "Cuidado Personal"),
    template("Galletitas Dulces 200g", 350, "Snacks"),
    template("Jugo de Naranja 1L", 500, "Bebidas"),
    template("Helado de Vainilla 1L", 1100, "Congelados"),
    template("Pasta Fideos 500g", 400, "Cocina"),
    template("Salsa de Tomate 500g", 300, "Cocina"),
    template("Jabón en Polvo 800g", 650, "Limpieza"),
    template("Acondicionador 400ml", 900, "Cuidado Personal"),
    template("Papas Fritas 150g", 400, "Snacks"),
    template("Agua Mineral 2L", 250, "Bebidas"),
    template("Pizza Congelada 400g", 950, "Congelados"),
    template("Manteca 200g", 500, "Lácteos"),
    template("Harina 1kg", 350, "Cocina"),
    template("Esponja de Limpieza", 150, "Limpieza"),
];

/// Lower bound of the uniform price multiplier (−20%).
pub const MIN_PRICE_MULTIPLIER: f64 = 0.8;
/// Upper bound of the uniform price multiplier (+20%).
pub const MAX_PRICE_MULTIPLIER: f64 = 1.2;

/// Applies a price multiplier to a base price and rounds to two decimal
/// places (banker's rounding).
#[must_use]
pub fn perturbed_price(base_price: Decimal, multiplier: f64) -> Decimal {
    // The multiplier is drawn from [0.8, 1.2] and is always finite.
    let multiplier = Decimal::from_f64_retain(multiplier).unwrap_or(Decimal::ONE);
    (base_price * multiplier).round_dp(2)
}

/// Generates `count` sample records by cycling [`BASE_TEMPLATES`].
///
/// The template sequence, and with it the multiset of names and categories,
/// is fully determined by `count`. Only prices and store assignments consume
/// randomness, so a seeded `rng` reproduces a run exactly while the coverage
/// properties hold for any generator.
#[must_use]
pub fn generate_products<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<ProductRecord> {
    (0..count)
        .map(|i| {
            let template = &BASE_TEMPLATES[i % BASE_TEMPLATES.len()];
            let multiplier = rng.random_range(MIN_PRICE_MULTIPLIER..=MAX_PRICE_MULTIPLIER);
            let store = STORES[rng.random_range(0..STORES.len())];
            ProductRecord {
                name: template.name.to_string(),
                name_lower: None,
                price: perturbed_price(Decimal::from(template.base_price), multiplier),
                store: store.to_string(),
                category: template.category.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
