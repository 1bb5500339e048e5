use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

pub const CART_ADDED_TITLE: &str = "Added to Cart";
pub const CART_ADDED_MESSAGE: &str = "Item has been added to your shopping cart.";
pub const FAVORITES_UPDATED_TITLE: &str = "Favorites Updated";
pub const FAVORITES_UPDATED_MESSAGE: &str = "Item added to your favorites.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Men,
    Women,
    Accessories,
}

impl ProductCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "men" => Some(ProductCategory::Men),
            "women" => Some(ProductCategory::Women),
            "accessories" => Some(ProductCategory::Accessories),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: u32,
    pub image: String,
    pub rating: f64,
    pub reviews: u32,
    pub category: ProductCategory,
    pub subcategory: &'static str,
    pub is_favorite: bool,
    pub in_stock: bool,
}

const MEN_STYLES: [&str; 10] = [
    "Thunder", "Volt", "Electric", "Power", "Charge", "Spark", "Energy", "Circuit", "Current",
    "Ion",
];
const MEN_GARMENTS: [&str; 10] = [
    "Jacket",
    "T-Shirt",
    "Hoodie",
    "Cap",
    "Polo",
    "Sweater",
    "Tank Top",
    "Windbreaker",
    "Vest",
    "Long Sleeve",
];
const MEN_SUBCATEGORIES: [&str; 4] = ["jackets", "shirts", "hoodies", "caps"];

const WOMEN_STYLES: [&str; 10] = [
    "Luna", "Electra", "Voltage", "Amp", "Watt", "Ohm", "Tesla", "Joule", "Kelvin", "Newton",
];
const WOMEN_GARMENTS: [&str; 10] = [
    "Top",
    "Leggings",
    "Jacket",
    "Cap",
    "Sports Bra",
    "Dress",
    "Skirt",
    "Cardigan",
    "Blouse",
    "Shorts",
];
const WOMEN_SUBCATEGORIES: [&str; 4] = ["tops", "leggings", "jackets", "caps"];

const ACCESSORY_GRADES: [&str; 10] = [
    "Smart", "Pro", "Elite", "Premium", "Advanced", "Deluxe", "Ultra", "Super", "Mega", "Turbo",
];
const ACCESSORY_ITEMS: [&str; 13] = [
    "Charging Cable",
    "Keychain",
    "Gloves",
    "EV Tag",
    "Helmet",
    "Portable Charger",
    "Tire Inflator",
    "Phone Mount",
    "Car Organizer",
    "Seat Cover",
    "Steering Wheel Cover",
    "Dashboard Cam",
    "Air Freshener",
];
const ACCESSORY_SUBCATEGORIES: [&str; 4] = ["charging", "protection", "comfort", "tech"];

pub const MEN_COUNT: u32 = 30;
pub const WOMEN_COUNT: u32 = 30;
pub const ACCESSORY_COUNT: u32 = 25;

fn random_rating<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    ((rng.random::<f64>() * 2.0 + 3.0) * 10.0).round() / 10.0
}

/// Builds the mock catalog: apparel for men and women plus accessories.
pub fn generate_catalog<R: Rng + ?Sized>(rng: &mut R) -> Vec<Product> {
    let mut products = Vec::with_capacity((MEN_COUNT + WOMEN_COUNT + ACCESSORY_COUNT) as usize);

    for i in 0..MEN_COUNT as usize {
        products.push(Product {
            id: i as u32 + 1,
            name: format!(
                "Men's EV {} {}",
                MEN_STYLES[i % 10],
                MEN_GARMENTS[(i / 3) % 10]
            ),
            price: rng.random_range(30..230),
            image: format!("men-{}", i + 1),
            rating: random_rating(rng),
            reviews: rng.random_range(10..510),
            category: ProductCategory::Men,
            subcategory: MEN_SUBCATEGORIES[i * 2 / 15],
            is_favorite: rng.random_bool(0.2),
            in_stock: rng.random_bool(0.9),
        });
    }

    for i in 0..WOMEN_COUNT as usize {
        products.push(Product {
            id: MEN_COUNT + i as u32 + 1,
            name: format!(
                "Women's EV {} {}",
                WOMEN_STYLES[i % 10],
                WOMEN_GARMENTS[(i / 3) % 10]
            ),
            price: rng.random_range(25..205),
            image: format!("women-{}", i + 1),
            rating: random_rating(rng),
            reviews: rng.random_range(15..415),
            category: ProductCategory::Women,
            subcategory: WOMEN_SUBCATEGORIES[i * 2 / 15],
            is_favorite: rng.random_bool(0.2),
            in_stock: rng.random_bool(0.9),
        });
    }

    for i in 0..ACCESSORY_COUNT as usize {
        products.push(Product {
            id: MEN_COUNT + WOMEN_COUNT + i as u32 + 1,
            name: format!(
                "EV {} {}",
                ACCESSORY_GRADES[i % 10],
                ACCESSORY_ITEMS[i % 13]
            ),
            price: rng.random_range(15..515),
            image: format!("accessory-{}", i + 1),
            rating: random_rating(rng),
            reviews: rng.random_range(5..305),
            category: ProductCategory::Accessories,
            subcategory: ACCESSORY_SUBCATEGORIES[i * 4 / 25],
            is_favorite: rng.random_bool(0.2),
            in_stock: rng.random_bool(0.95),
        });
    }

    products
}

pub fn search_products<'a>(
    products: &'a [Product],
    query: Option<&str>,
    category: Option<&str>,
) -> Vec<&'a Product> {
    let query = query.unwrap_or_default().trim().to_lowercase();
    let category = category.and_then(ProductCategory::parse);

    products
        .iter()
        .filter(|product| query.is_empty() || product.name.to_lowercase().contains(&query))
        .filter(|product| category.is_none_or(|wanted| product.category == wanted))
        .collect()
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShopError {
    #[error("product not found")]
    NotFound,
    #[error("{name} is out of stock")]
    OutOfStock { name: String },
}

/// The catalog plus each user's cart. Carts hold product ids in the order
/// they were added and may repeat an id.
#[derive(Debug, Clone, Default)]
pub struct Storefront {
    products: Vec<Product>,
    carts: HashMap<String, Vec<u32>>,
}

impl Storefront {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            carts: HashMap::new(),
        }
    }

    pub fn search(&self, query: Option<&str>, category: Option<&str>) -> Vec<&Product> {
        search_products(&self.products, query, category)
    }

    pub fn cart(&self, user_id: &str) -> &[u32] {
        self.carts.get(user_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the cart size after the add.
    pub fn add_to_cart(&mut self, user_id: &str, product_id: u32) -> Result<usize, ShopError> {
        let product = self
            .products
            .iter()
            .find(|product| product.id == product_id)
            .ok_or(ShopError::NotFound)?;
        if !product.in_stock {
            return Err(ShopError::OutOfStock {
                name: product.name.clone(),
            });
        }

        let cart = self.carts.entry(user_id.to_string()).or_default();
        cart.push(product_id);
        Ok(cart.len())
    }

    pub fn toggle_favorite(&mut self, product_id: u32) -> Result<&Product, ShopError> {
        let product = self
            .products
            .iter_mut()
            .find(|product| product.id == product_id)
            .ok_or(ShopError::NotFound)?;
        product.is_favorite = !product.is_favorite;
        Ok(product)
    }
}
