//! Kinds command handler

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::OutputWriter;
use fieldconf_core::FieldConfigKind;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct KindInfo {
    kind: FieldConfigKind,
    processor: bool,
}

fn kind_infos() -> Vec<KindInfo> {
    FieldConfigKind::ALL
        .iter()
        .map(|kind| KindInfo {
            kind: *kind,
            processor: kind.has_processor(),
        })
        .collect()
}

/// Handle the kinds command
pub fn handle_kinds(output: &mut OutputWriter) -> Result<()> {
    let infos = kind_infos();

    if output.format() != OutputFormat::Human {
        return output.data(&infos);
    }

    let rows = infos
        .iter()
        .map(|info| {
            vec![
                info.kind.to_string(),
                if info.processor { "yes" } else { "no (pass-through)" }.to_string(),
            ]
        })
        .collect();
    output.table(&["KIND", "PROCESSOR"], rows)
}
