//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use carbontrace_domain::{Product, ProductDetails, RawMaterial};
use carbontrace_filter::{Field, Step};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a product list.
    pub fn format_products(&self, products: &[Product]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_products_json(products),
            OutputFormat::Table => Ok(self.format_products_table(products)),
            OutputFormat::Quiet => Ok(join_lines(products.iter().map(|p| p.product_id.to_string()))),
        }
    }

    fn format_products_json(&self, products: &[Product]) -> Result<String> {
        let json: Vec<serde_json::Value> = products.iter().map(product_json).collect();
        Ok(serde_json::to_string_pretty(&json)?)
    }

    fn format_products_table(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return self.colorize("No products found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Id", "Name", "Owner", "CF", "Ended"]);

        for p in products {
            builder.push_record([
                p.product_id.to_string(),
                p.name.clone(),
                p.owner.to_string(),
                p.carbon_footprint.to_string(),
                yes_no(p.is_ended).to_string(),
            ]);
        }

        render(builder)
    }

    /// Format a raw material list.
    pub fn format_raw_materials(&self, materials: &[RawMaterial]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = materials
                    .iter()
                    .map(|m| {
                        serde_json::json!({
                            "material_id": m.material_id,
                            "name": m.name,
                            "lot": m.lot,
                            "supplier": m.supplier.as_str(),
                            "carbon_footprint": m.carbon_footprint,
                            "is_used": m.is_used,
                            "transformer": m.transformer.as_str(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                if materials.is_empty() {
                    return Ok(self.colorize("No raw materials found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Id", "Name", "Lot", "Supplier", "CF", "Used", "Transformer"]);
                for m in materials {
                    builder.push_record([
                        m.material_id.to_string(),
                        m.name.clone(),
                        m.lot.to_string(),
                        m.supplier.to_string(),
                        m.carbon_footprint.to_string(),
                        yes_no(m.is_used).to_string(),
                        m.transformer.to_string(),
                    ]);
                }
                Ok(render(builder))
            }
            OutputFormat::Quiet => Ok(join_lines(materials.iter().map(|m| m.material_id.to_string()))),
        }
    }

    /// Format the detailed view of one product.
    pub fn format_details(&self, details: &ProductDetails) -> Result<String> {
        let p = &details.product;

        match self.format {
            OutputFormat::Json => {
                let mut json = product_json(p);
                json["raw_materials"] = details
                    .raw_materials
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "name": r.name,
                            "lot": r.lot,
                            "supplier": r.supplier.as_str(),
                            "transformer": r.transformer.as_str(),
                            "carbon_footprint": r.carbon_footprint,
                        })
                    })
                    .collect();
                json["transformations"] = details
                    .transformations
                    .iter()
                    .map(|t| {
                        serde_json::json!({
                            "transformer": t.transformer.as_str(),
                            "carbon_footprint": t.carbon_footprint,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(p.product_id.to_string()),
            OutputFormat::Table => {
                let mut out = String::new();

                let rows = [
                    ("Product", format!("{} ({})", p.name, p.product_id)),
                    ("Owner", p.owner.to_string()),
                    ("Carbon footprint", p.carbon_footprint.to_string()),
                    ("  from raw materials", details.raw_material_footprint().to_string()),
                    ("  from transformations", details.transformation_footprint().to_string()),
                    ("Ended", yes_no(p.is_ended).to_string()),
                ];
                let mut summary = Builder::default();
                for (label, value) in rows {
                    summary.push_record([label.to_string(), value]);
                }
                let mut table = summary.build();
                table.with(Style::rounded());
                out.push_str(&table.to_string());
                out.push('\n');

                out.push_str(&self.colorize("Raw materials used", "cyan"));
                out.push('\n');
                if details.raw_materials.is_empty() {
                    out.push_str("  none\n");
                } else {
                    let mut builder = Builder::default();
                    builder.push_record(["Name", "Lot", "Supplier", "CF"]);
                    for r in &details.raw_materials {
                        builder.push_record([
                            r.name.clone(),
                            r.lot.to_string(),
                            r.supplier.to_string(),
                            r.carbon_footprint.to_string(),
                        ]);
                    }
                    out.push_str(&render(builder));
                    out.push('\n');
                }

                out.push_str(&self.colorize("Transformations", "cyan"));
                out.push('\n');
                if details.transformations.is_empty() {
                    out.push_str("  none");
                } else {
                    let mut builder = Builder::default();
                    builder.push_record(["Transformer", "CF"]);
                    for t in &details.transformations {
                        builder.push_record([t.transformer.to_string(), t.carbon_footprint.to_string()]);
                    }
                    out.push_str(&render(builder));
                }

                Ok(out)
            }
        }
    }

    /// Format the steps of a filter chain.
    pub fn format_steps(&self, steps: &[Step]) -> String {
        if steps.is_empty() {
            return self.colorize("No filter applied yet.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Logic", "Criterion", "Results"]);
        for (i, step) in steps.iter().enumerate() {
            builder.push_record([
                (i + 1).to_string(),
                step.mode.map(|m| m.to_string()).unwrap_or_else(|| "-".to_string()),
                step.criterion.to_string(),
                step.result_len.to_string(),
            ]);
        }
        render(builder)
    }

    /// Format the table of filterable fields.
    pub fn format_fields(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Source", "Operators"]);
        for field in Field::ALL {
            let operators = field
                .kind()
                .operators()
                .iter()
                .map(|op| op.symbol())
                .collect::<Vec<_>>()
                .join(" ");
            builder.push_record([
                field.as_str().to_string(),
                field.source().to_string(),
                operators,
            ]);
        }
        render(builder)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn product_json(p: &Product) -> serde_json::Value {
    serde_json::json!({
        "product_id": p.product_id.value(),
        "name": p.name,
        "owner": p.owner.as_str(),
        "carbon_footprint": p.carbon_footprint,
        "is_ended": p.is_ended,
    })
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn join_lines<I: Iterator<Item = String>>(lines: I) -> String {
    lines.collect::<Vec<_>>().join("\n")
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbontrace_domain::{Address, ProductId, RawMaterialUsed, Transformation};

    fn owner() -> Address {
        Address::parse("0x1111111111111111111111111111111111111111").unwrap()
    }

    fn products() -> Vec<Product> {
        vec![
            Product::new(ProductId::new(1), "Shirt".to_string(), owner(), 50),
            Product {
                is_ended: true,
                ..Product::new(ProductId::new(2), "Jacket".to_string(), owner(), 120)
            },
        ]
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_products(&products()).unwrap();
        assert!(output.contains("Owner"));
        assert!(output.contains("Jacket"));
        assert!(output.contains("yes"));
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_products(&products()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[1]["carbon_footprint"], 120);
        assert_eq!(parsed[1]["is_ended"], true);
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_products(&products()).unwrap();
        assert_eq!(output, "1\n2");
    }

    #[test]
    fn test_empty_products() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_products(&[]).unwrap();
        assert!(output.contains("No products found"));
    }

    #[test]
    fn test_details_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let product = products().remove(1);
        let details = ProductDetails {
            raw_materials: vec![RawMaterialUsed {
                product_id: product.product_id,
                supplier: owner(),
                transformer: owner(),
                name: "Wool".to_string(),
                lot: 3,
                carbon_footprint: 70,
            }],
            transformations: vec![Transformation {
                product_id: product.product_id,
                transformer: owner(),
                carbon_footprint: 50,
            }],
            product,
        };

        let output = formatter.format_details(&details).unwrap();
        assert!(output.contains("Jacket (2)"));
        assert!(output.contains("Wool"));
        assert!(output.contains("from transformations"));
    }

    #[test]
    fn test_details_json_includes_events() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let details = ProductDetails {
            product: products().remove(0),
            raw_materials: Vec::new(),
            transformations: Vec::new(),
        };

        let output = formatter.format_details(&details).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["name"], "Shirt");
        assert!(parsed["transformations"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_fields_table_lists_every_field() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_fields();
        for field in Field::ALL {
            assert!(output.contains(field.as_str()));
        }
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
