use std::fmt::Write as _;

use checkout_core::address::AddressPage;
use checkout_core::collaborators::{ContactSubmitter, LocalityLookup};
use checkout_core::models::{ContactRecord, Locality};
use checkout_core::order_summary::OrderSummary;

const LABEL_WIDTH: usize = 12;

pub(crate) fn summary(summary: &OrderSummary) -> String {
    let mut out = String::from("Resumen de Orden\n");
    for line in summary.lines() {
        let _ = writeln!(out, "  {:<32} {:>14}", line.name, line.price);
    }
    let _ = writeln!(out, "  {:<32} {:>14}", "SUBTOTAL", summary.subtotal_display());
    let _ = writeln!(out, "  {:<32} {:>14}", "ENVÍO", summary.shipping_display());
    let _ = writeln!(out, "  {:<32} {:>14}", "TOTAL", summary.total_display());
    out
}

pub(crate) fn locality(locality: &Locality) -> String {
    let mut out = String::new();
    row(&mut out, "city", &locality.city);
    row(&mut out, "town", &locality.town);
    row(&mut out, "state", &locality.state);
    row(&mut out, "colonies", &locality.colonies.join(", "));
    out
}

pub(crate) fn contact(record: &ContactRecord) -> String {
    let mut out = String::from("saved shipping address\n");
    row(&mut out, "name", &format!("{} {}", record.name, record.last_name));
    row(&mut out, "telephone", &record.telephone);
    row(&mut out, "email", &record.email);
    row(&mut out, "street", &record.street);
    row(&mut out, "colony", &record.colony);
    row(
        &mut out,
        "city",
        &format!("{}, {}, {} {}", record.town, record.city, record.state, record.code),
    );
    row(&mut out, "billing", if record.policy { "yes" } else { "no" });
    out
}

pub(crate) fn missing_fields<L, S>(page: &AddressPage<L, S>, missing: &[String]) -> String
where
    L: LocalityLookup,
    S: ContactSubmitter,
{
    let mut out = String::from("address form is incomplete\n");
    for field in missing {
        row(&mut out, field, &page.validation_message(field));
    }
    out
}

fn row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label:<width$} {value}", width = LABEL_WIDTH);
}

#[cfg(test)]
mod tests {
    use checkout_core::models::Product;

    use super::*;

    #[test]
    fn summary_lists_products_and_totals() {
        let order = OrderSummary::new(vec![
            Product {
                name: "Tenis".to_string(),
                price: "10.50".to_string(),
                image: String::new(),
            },
            Product {
                name: "Gorra".to_string(),
                price: "5".to_string(),
                image: String::new(),
            },
        ]);

        let text = summary(&order);

        assert!(text.contains("Tenis"));
        assert!(text.contains("$10.50"));
        assert!(text.contains("A calcular"));
        let total_line = text
            .lines()
            .find(|line| line.trim_start().starts_with("TOTAL"))
            .expect("total line");
        assert!(total_line.ends_with("$15.50"));
    }

    #[test]
    fn locality_joins_colonies() {
        let text = locality(&Locality {
            city: "Monterrey".to_string(),
            town: "Monterrey".to_string(),
            state: "Nuevo León".to_string(),
            colonies: vec!["Centro".to_string(), "Obispado".to_string()],
        });
        assert!(text.contains("Centro, Obispado"));
    }
}
