//! Turning result documents into samples
//!
//! Everything here is pure: a document and a metric descriptor go in, a
//! sample or a typed error comes out.

use super::types::{MetricDescriptor, Sample};
use crate::utils::error::{ExporterError, Result};
use bson::{Bson, Document};
use std::sync::Arc;

/// Build a sample for `metric` from one result document
pub fn synthesize(
    document: &Document,
    server: &str,
    metric: &Arc<MetricDescriptor>,
) -> Result<Sample> {
    let value = extract_value(document, &metric.template.value)?;
    let label_values = extract_labels(document, server, &metric.template.labels)?;

    Ok(Sample {
        metric: Arc::clone(metric),
        value,
        label_values,
    })
}

/// Sample emitted for an empty result set, with every declared label empty
pub fn empty_sample(server: &str, metric: &Arc<MetricDescriptor>) -> Sample {
    let mut label_values = Vec::with_capacity(metric.template.labels.len() + 1);
    label_values.push(server.to_string());
    label_values.resize(metric.template.labels.len() + 1, String::new());

    Sample {
        metric: Arc::clone(metric),
        value: metric.template.empty_value,
        label_values,
    }
}

/// Numeric value of `field` as a float
pub fn extract_value(document: &Document, field: &str) -> Result<f64> {
    match document.get(field) {
        Some(Bson::Int32(value)) => Ok(f64::from(*value)),
        Some(Bson::Int64(value)) => Ok(*value as f64),
        Some(Bson::Double(value)) => Ok(*value),
        Some(other) => Err(ExporterError::ValueNotNumeric {
            field: field.to_string(),
            kind: type_name(other),
        }),
        None => Err(ExporterError::ValueNotFound {
            field: field.to_string(),
        }),
    }
}

/// Label values: the server name followed by each label field, in order
pub fn extract_labels(document: &Document, server: &str, labels: &[String]) -> Result<Vec<String>> {
    let mut values = Vec::with_capacity(labels.len() + 1);
    values.push(server.to_string());

    for label in labels {
        match document.get(label) {
            Some(Bson::String(value)) => values.push(value.clone()),
            Some(other) => {
                return Err(ExporterError::LabelNotString {
                    label: label.clone(),
                    kind: type_name(other),
                });
            }
            None => {
                return Err(ExporterError::LabelNotFound {
                    label: label.clone(),
                });
            }
        }
    }

    Ok(values)
}

fn type_name(value: &Bson) -> String {
    format!("{:?}", value.element_type())
}
