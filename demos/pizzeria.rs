//! 披薩店成本與備料完整範例
//!
//! 展示從目錄建立、成本彙算到銷售單展開的完整流程

use recipe::{
    InMemoryCatalog, Ingredient, Preparation, Product, RecipeEngine, RecipeItem, SaleLine,
};
use rust_decimal::Decimal;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("===== Pizzeria Costing Example =====\n");

    // 步驟 1: 建立目錄
    println!("[1] Create Catalog");
    let catalog = InMemoryCatalog::new();

    catalog.upsert_ingredient(
        Ingredient::new("ING-FLOUR", "麵粉", "kg").with_cost(Decimal::from(2), "TWD"),
    )?;
    catalog.upsert_ingredient(
        Ingredient::new("ING-TOMATO", "番茄", "kg").with_cost(Decimal::new(35, 1), "TWD"),
    )?;
    catalog.upsert_ingredient(
        Ingredient::new("ING-CHEESE", "起司", "kg").with_cost(Decimal::from(12), "TWD"),
    )?;
    println!("    Ingredients: flour 2.00/kg, tomato 3.50/kg, cheese 12.00/kg");

    // 麵糰：每批 10 kg，用 6 kg 麵粉，損耗 10%，每批人工 3
    catalog.upsert_preparation(
        Preparation::new("PREP-DOUGH", "麵糰", Decimal::from(10), "kg")
            .with_waste_pct(Decimal::new(1, 1))
            .with_extra_cost(Decimal::from(3))
            .add_item(RecipeItem::ingredient("ING-FLOUR", Decimal::from(6))),
    )?;

    // 紅醬：每批 4 L，用 3 kg 番茄
    catalog.upsert_preparation(
        Preparation::new("PREP-SAUCE", "紅醬", Decimal::from(4), "L")
            .add_item(RecipeItem::ingredient("ING-TOMATO", Decimal::from(3))),
    )?;

    // 披薩：每個用 0.3 kg 麵糰、0.1 L 紅醬、0.12 kg 起司
    catalog.upsert_product(
        Product::new("PROD-PIZZA", "瑪格麗特披薩")
            .add_item(RecipeItem::preparation("PREP-DOUGH", Decimal::new(3, 1)))
            .add_item(RecipeItem::preparation("PREP-SAUCE", Decimal::new(1, 1)))
            .add_item(RecipeItem::ingredient("ING-CHEESE", Decimal::new(12, 2))),
    )?;
    println!("    Preparations: dough (10 kg/batch), sauce (4 L/batch)");
    println!("    Product: margherita pizza\n");

    let engine = RecipeEngine::new(catalog);

    // 步驟 2: 寫入前結構驗證
    println!("[2] Validate Graph");
    engine.validate_product("PROD-PIZZA")?;
    println!("    OK: no cycle, depth within cap\n");

    // 步驟 3: 成本彙算
    println!("[3] Cost Rollup");
    let dough = engine.compute_cost("PREP-DOUGH")?;
    println!(
        "    Dough: ingredients {}, total {}, unit {} {}/kg",
        dough.ingredients_cost, dough.total_cost, dough.unit_cost, dough.currency
    );
    let sauce = engine.compute_cost("PREP-SAUCE")?;
    println!(
        "    Sauce: unit {} {}/L\n",
        sauce.unit_cost, sauce.currency
    );

    // 步驟 4: 銷售單展開
    println!("[4] Expand Sale");
    let sale = vec![
        SaleLine::new("PROD-PIZZA", Decimal::from(5)),
        SaleLine::new("PROD-PIZZA", Decimal::from(3)),
    ];
    let consumption = engine.expand_sale(&sale)?;
    println!("    8 pizzas consume:");
    for line in &consumption.lines {
        println!("      - {} {} {}", line.ingredient_id, line.qty, line.unit);
    }
    println!();

    // 步驟 5: 食材漲價 → 快取失效 → 重新彙算
    println!("[5] Ingredient Price Change");
    engine.store().upsert_ingredient(
        Ingredient::new("ING-FLOUR", "麵粉", "kg").with_cost(Decimal::from(3), "TWD"),
    )?;
    let cleared = engine.ingredient_cost_changed("ING-FLOUR")?;
    println!("    Invalidated caches: {:?}", cleared);

    let dough = engine.recompute_and_persist("PREP-DOUGH")?;
    println!(
        "    Dough unit cost after change: {} {}/kg",
        dough.unit_cost, dough.currency
    );

    Ok(())
}
