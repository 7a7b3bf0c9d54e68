// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plain-text rendering of takeoff rows and element metadata.

use qto_lite_processing::{format_vertex, ElementMetadata, QuantityRow};
use std::io::{self, Write};

const HEADERS: [&str; 4] = ["Family", "Type", "Count", "Measure"];

/// Aligned four-column table.
pub fn write_quantity_table(out: &mut impl Write, rows: &[QuantityRow]) -> io::Result<()> {
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.family.clone(),
                row.type_name.clone(),
                row.count.to_string(),
                row.measure.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let write_line = |out: &mut dyn Write, line: [&str; 4]| -> io::Result<()> {
        let padded: Vec<String> = line
            .iter()
            .zip(widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect();
        writeln!(out, "{}", padded.join("  ").trim_end())
    };

    write_line(&mut *out, HEADERS)?;
    let rule = widths.map(|w| "-".repeat(w));
    write_line(
        &mut *out,
        [rule[0].as_str(), rule[1].as_str(), rule[2].as_str(), rule[3].as_str()],
    )?;
    for line in &cells {
        write_line(
            &mut *out,
            [line[0].as_str(), line[1].as_str(), line[2].as_str(), line[3].as_str()],
        )?;
    }
    Ok(())
}

/// Element header, property list and one block per face.
pub fn write_metadata(out: &mut impl Write, metadata: &ElementMetadata) -> io::Result<()> {
    let name = metadata.name.as_deref().unwrap_or("(unnamed)");
    writeln!(out, "{} (ID: {})", name, metadata.db_id)?;
    writeln!(out)?;

    writeln!(out, "Properties")?;
    for property in &metadata.properties {
        writeln!(out, "  {}: {}", property.display_name, property.display_value)?;
    }
    writeln!(out)?;

    writeln!(out, "Geometry")?;
    writeln!(out, "  Total Faces: {}", metadata.total_faces)?;
    for face in &metadata.faces {
        writeln!(out, "  Face {} - {}:", face.index, face.material)?;
        for vertex in &face.vertices {
            writeln!(out, "    {}", format_vertex(vertex))?;
        }
    }
    Ok(())
}
