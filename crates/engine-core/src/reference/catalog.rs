//! Reference rows every catalog database starts with.

use model::{
    catalog::{
        field::TargetField,
        reference::{ChildRecord, ColumnExpr, ColumnValue, ReferenceRecord},
    },
    core::value::Value,
};
use rust_decimal::Decimal;

pub const REFERENCE_PRODUCT_KEY: &str = "PROTEO50-REF";

const NAME_LENGTH: u32 = 100;
const DESCRIPTION_LENGTH: u32 = 500;

const CATEGORIES: [(&str, &str); 7] = [
    ("Salud y Cuidado Personal", "Productos de salud y cuidado personal"),
    ("Suplementos Proteicos", "Proteínas en polvo y suplementos"),
    ("Nutrición Deportiva", "Productos para atletas y deportistas"),
    ("Proteína Vegana", "Proteínas de origen vegetal"),
    ("Proteína Whey", "Proteínas de suero de leche"),
    ("Pet Food", "Alimentos para mascotas"),
    ("Ingredientes Base", "Ingredientes para la industria alimentaria"),
];

const BRANDS: [(&str, &str, &str); 7] = [
    ("BIRDMAN", "Marca mexicana de suplementos deportivos", "México"),
    ("OPTIMUM NUTRITION", "Líder mundial en nutrición deportiva", "Estados Unidos"),
    ("DYMATIZE", "Marca premium de proteínas", "Estados Unidos"),
    ("SASCHA FITNESS", "Marca de suplementos fitness", "Venezuela"),
    ("ORGAIN", "Proteínas orgánicas y naturales", "Estados Unidos"),
    ("HILLS", "Alimentos premium para mascotas", "Estados Unidos"),
    ("PROTEO", "Ingredientes biotecnológicos", "México"),
];

pub fn categories() -> Vec<ReferenceRecord> {
    CATEGORIES
        .iter()
        .map(|(name, description)| {
            ReferenceRecord::new("Categories", "Name", name)
                .with(ColumnValue::text("Name", Some(NAME_LENGTH), name))
                .with(ColumnValue::text(
                    "Description",
                    Some(DESCRIPTION_LENGTH),
                    description,
                ))
                .with(ColumnValue::now("CreatedAt"))
        })
        .collect()
}

pub fn brands() -> Vec<ReferenceRecord> {
    BRANDS
        .iter()
        .map(|(name, description, country)| {
            ReferenceRecord::new("Brands", "Name", name)
                .with(ColumnValue::text("Name", Some(NAME_LENGTH), name))
                .with(ColumnValue::text(
                    "Description",
                    Some(DESCRIPTION_LENGTH),
                    description,
                ))
                .with(ColumnValue::text("Country", Some(50), country))
                .with(ColumnValue::now("CreatedAt"))
        })
        .collect()
}

/// A `Products` column typed like the migration target field.
fn field_value(field: TargetField, value: Value) -> ColumnValue {
    ColumnValue {
        column: field.column().to_string(),
        data_type: field.data_type(),
        value: ColumnExpr::Value(value),
    }
}

fn nutrient(column: &str, value: Decimal) -> ColumnValue {
    ColumnValue::decimal(column, 10, 2, value)
}

/// The in-house yeast protein concentrate, with its nutrition facts and
/// positioning analysis.
pub fn reference_product() -> ReferenceRecord {
    let nutrition = ChildRecord::new("NutritionalInfo", "ProductId")
        .with(nutrient("Energy", Decimal::new(304, 0)))
        .with(nutrient("Protein", Decimal::new(478, 1)))
        .with(nutrient("TotalFat", Decimal::new(51, 1)))
        .with(nutrient("Carbohydrates", Decimal::new(32, 1)))
        .with(nutrient("DietaryFiber", Decimal::new(267, 1)))
        .with(nutrient("Sodium", Decimal::new(320, 0)));

    let analysis = ChildRecord::new("ProductAnalysis", "ProductId")
        .with(ColumnValue::text(
            "ValueProposition",
            None,
            "Alto en proteína y fibra con carbohidratos disponibles muy bajos. Perfil umami natural.",
        ))
        .with(ColumnValue::text(
            "KeyLabels",
            None,
            "Alto en proteína; Fuente de fibra; Bajo en carbohidratos; Origen biotecnológico",
        ))
        .with(ColumnValue::text(
            "IntendedSegment",
            None,
            "Industria alimentaria; Seasonings; Snacks; Bebidas; Cárnicos; Pet-food",
        ))
        .with(ColumnValue::decimal(
            "SimilarityScore",
            5,
            4,
            Decimal::new(10000, 4),
        ));

    ReferenceRecord::new(
        "Products",
        TargetField::Identifier.column(),
        REFERENCE_PRODUCT_KEY,
    )
    .with(field_value(
        TargetField::Identifier,
        Value::from(REFERENCE_PRODUCT_KEY),
    ))
    .with(field_value(
        TargetField::ProductName,
        Value::from("Proteo50 - Concentrado Proteico de Levadura"),
    ))
    .with(field_value(TargetField::Brand, Value::from("PROTEO")))
    .with(field_value(
        TargetField::Category,
        Value::from("Ingredientes Base"),
    ))
    .with(field_value(TargetField::Price, Value::Decimal(Decimal::new(85000, 2))))
    .with(field_value(TargetField::Rating, Value::Decimal(Decimal::new(50, 1))))
    .with(field_value(TargetField::Reviews, Value::Int32(0)))
    .with(ColumnValue::decimal("Weight", 8, 3, Decimal::new(1000, 3)))
    .with(ColumnValue::text("SellerType", Some(50), "Manufacturer"))
    .with(ColumnValue::text("SearchTerm", Some(200), "Proteina De Levadura"))
    .with(ColumnValue::now("CreatedAt"))
    .with_child(nutrition)
    .with_child(analysis)
}

/// Everything `seed` inserts, parents before the rows that reference
/// them by name.
pub fn all() -> Vec<ReferenceRecord> {
    let mut records = categories();
    records.extend(brands());
    records.push(reference_product());
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::data_type::DataType;
    use std::collections::HashSet;

    #[test]
    fn test_natural_keys_are_unique_per_table() {
        let records = all();
        let keys: HashSet<_> = records
            .iter()
            .map(|r| (r.table.clone(), r.key.clone()))
            .collect();
        assert_eq!(keys.len(), records.len());
        assert_eq!(categories().len(), 7);
        assert_eq!(brands().len(), 7);
    }

    #[test]
    fn test_key_column_is_part_of_values() {
        for record in all() {
            let key_value = record
                .values
                .iter()
                .find(|v| v.column == record.key_column)
                .unwrap_or_else(|| panic!("{} has no {} value", record.key, record.key_column));
            assert_eq!(key_value.value, ColumnExpr::Value(Value::from(record.key.as_str())));
        }
    }

    #[test]
    fn test_reference_product_shape() {
        let product = reference_product();
        assert_eq!(product.table, "Products");
        assert_eq!(product.key_column, "ASIN");
        assert_eq!(product.children.len(), 2);
        assert_eq!(product.children[0].values.len(), 6);

        let price = product.values.iter().find(|v| v.column == "Price").unwrap();
        assert_eq!(price.data_type, DataType::decimal(10, 2));
        assert_eq!(
            price.value,
            ColumnExpr::Value(Value::Decimal(Decimal::new(85000, 2)))
        );
        let reviews = product
            .values
            .iter()
            .find(|v| v.column == "ReviewCount")
            .unwrap();
        assert_eq!(reviews.value, ColumnExpr::Value(Value::Int32(0)));
    }
}
