//! Demo catalog loaded into empty stores.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::domain::aggregates::Product;
use crate::store::{Store, StoreResult};

struct SeedProduct {
    name: &'static str,
    price: i64,
    quantity: &'static str,
    img: &'static str,
    category: &'static str,
    description: &'static str,
    how_to_use: &'static str,
    benefits: &'static [&'static str],
    ingredients: &'static str,
}

const CATALOG: &[SeedProduct] = &[
    SeedProduct {
        name: "Amashay Churn",
        price: 180,
        quantity: "100gm",
        img: "/Amashay_Churn.jpg",
        category: "Digestion",
        description: "A potent Ayurvedic digestive powder crafted from rare Himalayan herbs. Specially formulated to soothe stomach discomfort, reduce bloating, and enhance overall digestion naturally.",
        how_to_use: "Mix 1 teaspoon (approx. 5g) with a glass of lukewarm water. Consume twice daily, preferably 30 minutes after lunch and dinner.",
        benefits: &["Soothes indigestion and acidity.", "Reduces gas and bloating.", "Improves nutrient absorption.", "Promotes regular bowel movements."],
        ingredients: "Triphala, Hing, Ajwain, Saunf, Jeera, Pudina Satva, etc...",
    },
    SeedProduct {
        name: "Daant Manjan",
        price: 90,
        quantity: "50gm",
        img: "/Daant_Manjan.jpg",
        category: "Oral Care",
        description: "A herbal tooth powder enriched with cloves and neem for strong, healthy teeth and fresh breath. Naturally whitens and protects gums.",
        how_to_use: "Take a small amount on a soft toothbrush or finger. Gently massage teeth and gums for 2 minutes. Rinse thoroughly.",
        benefits: &["Saves water compared to toothpaste.", "Strengthens teeth and gums.", "Fights bad breath.", "Helps prevent cavities.", "Natural whitening."],
        ingredients: "Neem Bark, Clove Oil, Babool Bark, Vajradanti, Mulethi, Camphor, etc...",
    },
    SeedProduct {
        name: "Face Pack",
        price: 160,
        quantity: "70gm",
        img: "/Face_Pack.jpg",
        category: "Skin Care",
        description: "Rejuvenating herbal face pack with Multani Mitti and Sandalwood for clear, radiant skin. Removes impurities and excess oil.",
        how_to_use: "Mix 1-2 teaspoons with rose water or milk. Apply evenly on cleansed face. Leave for 15-20 mins. Rinse with cool water.",
        benefits: &["Deep cleanses pores.", "Controls excess oil and acne.", "Improves skin tone.", "Cooling and soothing."],
        ingredients: "Multani Mitti, Sandalwood Powder, Rose Petal Powder, Neem Powder, Turmeric, etc...",
    },
    SeedProduct {
        name: "Jodo Ka Tail",
        price: 180,
        quantity: "60ml",
        img: "/Jodo_Ka_Tail.jpg",
        category: "Pain Relief",
        description: "Warming Ayurvedic massage oil formulated to relieve joint and muscle discomfort. Infused with potent herbs for deep penetration.",
        how_to_use: "Warm slightly. Massage onto affected joints for 10-15 minutes. Apply 2-3 times a day.",
        benefits: &["Soothes joint pain.", "Reduces muscle soreness.", "Improves flexibility.", "Strengthens bones and muscles."],
        ingredients: "Sesame Oil, Mahanarayan Oil, Wintergreen Oil, Eucalyptus Oil, Camphor, etc...",
    },
    SeedProduct {
        name: "Kesh Ratn Hair Oil",
        price: 360,
        quantity: "100ml",
        img: "/Kesh_Ratn.jpg",
        category: "Hair Care",
        description: "Nourishing herbal hair oil enriched with Bhringraj and Amla to promote healthy hair growth, reduce hair fall, and prevent premature graying.",
        how_to_use: "Massage into scalp for 10-15 mins. Leave for an hour or overnight. Wash with herbal shampoo.",
        benefits: &["Reduces hair fall.", "Promotes thick growth.", "Nourishes scalp.", "Adds natural shine."],
        ingredients: "Coconut Oil, Sesame Oil, Bhringraj, Amla, Brahmi, Neem, Hibiscus, etc...",
    },
    SeedProduct {
        name: "Power Churan",
        price: 340,
        quantity: "70gm",
        img: "/Power_Churan.jpg",
        category: "Wellness",
        description: "An invigorating Ayurvedic blend to boost energy levels, improve stamina, and combat fatigue naturally.",
        how_to_use: "Take 1 teaspoon with warm milk or water, preferably in the morning.",
        benefits: &["Enhances energy and stamina.", "Reduces fatigue.", "Improves concentration.", "Supports immunity."],
        ingredients: "Ashwagandha, Shatavari, Safed Musli, Kaunch Beej, Gokshura, etc...",
    },
    SeedProduct {
        name: "Rambaan Tail",
        price: 180,
        quantity: "60ml",
        img: "/Rambaan_Tail.jpg",
        category: "First Aid",
        description: "Multi-purpose Ayurvedic healing oil known for its antiseptic properties. Effective for minor cuts, burns, and skin irritations.",
        how_to_use: "Apply directly to affected area 2-3 times daily.",
        benefits: &["Faster healing of wounds.", "Soothes burns.", "Natural antiseptic.", "Relieves itching."],
        ingredients: "Neem Oil, Karanja Oil, Coconut Oil, Turmeric, Camphor, etc...",
    },
    SeedProduct {
        name: "Madhumeha Churna",
        price: 180,
        quantity: "70gm",
        img: "/Madhumeha_Churan.jpg",
        category: "Wellness",
        description: "Ayurvedic formulation designed to support healthy blood sugar levels. A blend of natural herbs traditionally used for managing Diabetes.",
        how_to_use: "Take 1 teaspoon with water twice a day after meals.",
        benefits: &["Regulates blood sugar.", "Supports urinary health.", "Metabolic balance.", "Pure herbs."],
        ingredients: "Gudmar, Jamun, Ajwain, Lango, Karega Beg, Purasnava, Dudhini, etc...",
    },
    SeedProduct {
        name: "Sandhivatsal Churna",
        price: 210,
        quantity: "70gm",
        img: "/Sandhivatsal_Churna.jpeg",
        category: "Pain Relief",
        description: "Ayurvedic formulation specially designed to support joint and bone health. Helps relieve stiffness and swelling.",
        how_to_use: "Take 1 teaspoon with warm water/milk twice a day after meals.",
        benefits: &["Relieves joint pain.", "Improves mobility.", "Supports bone health.", "Helps with arthritis."],
        ingredients: "Ashwagandha, Guggul, Dry Ginger, Rasna, Eranda Mool, Shallaki, Nirgundi, etc...",
    },
];

/// Products in catalog order; creation times are staggered so listings keep this order.
pub fn demo_catalog() -> Vec<Product> {
    let start = Utc::now() - Duration::minutes(CATALOG.len() as i64);
    CATALOG.iter().enumerate().map(|(i, p)| Product {
        id: Uuid::now_v7(),
        name: p.name.to_string(),
        price: Decimal::from(p.price),
        description: p.description.to_string(),
        category: p.category.to_string(),
        quantity: p.quantity.to_string(),
        img: p.img.to_string(),
        ingredients: Some(p.ingredients.to_string()),
        how_to_use: Some(p.how_to_use.to_string()),
        benefits: p.benefits.iter().map(|b| b.to_string()).collect(),
        stock: 50,
        created_at: start + Duration::minutes(i as i64),
    }).collect()
}

/// Inserts the demo catalog when the store has no products yet.
pub async fn seed_catalog(store: &dyn Store) -> StoreResult<usize> {
    if store.product_count().await? > 0 {
        return Ok(0);
    }
    let products = demo_catalog();
    for product in &products {
        store.insert_product(product).await?;
    }
    info!(count = products.len(), "seeded demo catalog");
    Ok(products.len())
}
