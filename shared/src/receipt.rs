//! Printable reception receipt

use std::fmt::Write;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregation::{display_kg, ReceptionTotals};
use crate::models::{ClusterName, ReceptionData, SubFieldKind};

pub const RECEIPT_TITLE: &str = "RECEPCIÓN DE PADDY";
const NOT_AVAILABLE: &str = "N/A";
const WIDTH: usize = 48;

/// A label/value line on the receipt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceiptLine {
    pub label: String,
    pub value: String,
}

impl ReceiptLine {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// Receipt document for a reception
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionReceipt {
    pub title: String,
    pub producer: Vec<ReceiptLine>,
    pub reception: Vec<ReceiptLine>,
    pub analysis: Vec<ReceiptLine>,
    pub weights: Vec<ReceiptLine>,
}

fn or_na(value: &str) -> String {
    if value.trim().is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

impl ReceptionReceipt {
    pub fn build(data: &ReceptionData, date: NaiveDate) -> Self {
        let general = &data.general;
        let producer = vec![
            ReceiptLine::new("Nombre", or_na(&general.producer_name)),
            ReceiptLine::new("RUT", or_na(&general.producer_rut)),
            ReceiptLine::new("Razón Social", or_na(&general.producer_business_name)),
            ReceiptLine::new("Dirección", or_na(&general.producer_address)),
        ];
        let reception = vec![
            ReceiptLine::new("Fecha", date.format("%d-%m-%Y").to_string()),
            ReceiptLine::new("Guía", or_na(&general.guide)),
            ReceiptLine::new("Placa Patente", or_na(&general.license_plate)),
            ReceiptLine::new("Plantilla", or_na(&data.template.name)),
        ];

        let analysis = ClusterName::ANALYSIS
            .iter()
            .filter_map(|name| {
                let cluster = data.clusters.get(*name)?;
                let range = cluster.value(SubFieldKind::Range)?;
                let percent = cluster
                    .value(SubFieldKind::Percent)
                    .map(|p| format!("{}%", p.normalize()))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string());
                Some(ReceiptLine::new(
                    name.label(),
                    format!(
                        "{} | {} | {}",
                        range.normalize(),
                        percent,
                        display_kg(cluster.value(SubFieldKind::Penalty))
                    ),
                ))
            })
            .collect();

        let totals = ReceptionTotals::from_clusters(&data.clusters);
        let weights = totals
            .lines()
            .iter()
            .map(|(label, value)| ReceiptLine::new(label, *value))
            .collect();

        Self {
            title: RECEIPT_TITLE.to_string(),
            producer,
            reception,
            analysis,
            weights,
        }
    }

    /// Plain-text rendering for a line printer
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(WIDTH);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{:^width$}", self.title, width = WIDTH);
        let _ = writeln!(out, "{rule}");

        for (heading, lines) in [
            ("Datos del Productor", &self.producer),
            ("Datos de la Recepción", &self.reception),
            ("Análisis de Granos", &self.analysis),
            ("Resumen de Pesos", &self.weights),
        ] {
            if lines.is_empty() {
                continue;
            }
            let _ = writeln!(out, "{heading}");
            let _ = writeln!(out, "{}", "-".repeat(WIDTH));
            for line in lines {
                let label = format!("{}:", line.label);
                let pad = WIDTH.saturating_sub(label.chars().count() + line.value.chars().count());
                let _ = writeln!(out, "{label}{}{}", " ".repeat(pad.max(1)), line.value);
            }
            let _ = writeln!(out);
        }
        out
    }
}
