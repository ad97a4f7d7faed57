use stockroom_core::{StoreResult, TableRepository};
use stockroom_shared::clock::now_iso;
use stockroom_shared::{tables, Product};
use tracing::info;

/// Tables created by a provisioning run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub created: Vec<String>,
    pub seeded_products: usize,
}

fn sample_products() -> Vec<Product> {
    let stamp = now_iso();
    [
        ("WH-001", "Wireless Headphones", 25, "Electronics", "A1-B2"),
        ("USB-002", "USB Cable", 150, "Accessories", "A2-B1"),
        ("PC-003", "Phone Case", 75, "Accessories", "A1-C3"),
    ]
    .into_iter()
    .map(|(id, name, stock, category, location)| Product {
        id: id.to_string(),
        name: name.to_string(),
        current_stock: stock,
        category: category.to_string(),
        location: location.to_string(),
        last_updated: stamp.clone(),
    })
    .collect()
}

/// Creates Products, Transactions and Logs with their header rows when they
/// are missing. Sample products are written only into a freshly created
/// Products table; existing tables are left untouched.
pub async fn provision(store: &dyn TableRepository, seed: bool) -> StoreResult<ProvisionReport> {
    let mut report = ProvisionReport::default();

    for (table, header) in tables::layout() {
        if store.ensure_table(table, header).await? {
            info!("Created table {}", table);
            report.created.push(table.to_string());

            if table == tables::PRODUCTS && seed {
                for product in sample_products() {
                    store.append(tables::PRODUCTS, product.to_row()).await?;
                    report.seeded_products += 1;
                }
            }
        }
    }

    Ok(report)
}
