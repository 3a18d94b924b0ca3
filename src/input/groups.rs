use std::collections::BTreeMap;
use std::path::Path;

use crate::input::reader::read_rows;
use crate::input::InputError;
use crate::model::group::{CoreGroup, CoreSet, GroupMember};

/// Parse the core set definition: `group_id  species_id  protein_id`,
/// one member per row. Member order within a group follows file order.
pub fn parse_groups(path: &Path) -> Result<CoreSet, InputError> {
    let rows = read_rows(path)?;
    let mut members: BTreeMap<String, Vec<GroupMember>> = BTreeMap::new();
    let mut order: Vec<String> = Vec::new();

    for (line_no, line) in &rows {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 3 {
            return Err(InputError::Parse {
                path: path.display().to_string(),
                line: *line_no,
                message: format!("expected 3 columns, got {}", cols.len()),
            });
        }
        let group_id = cols[0].trim().to_string();
        let species = cols[1].trim().to_string();
        let protein = cols[2].trim().to_string();
        if group_id.is_empty() || species.is_empty() || protein.is_empty() {
            return Err(InputError::Parse {
                path: path.display().to_string(),
                line: *line_no,
                message: "empty group, species or protein id".to_string(),
            });
        }
        if !members.contains_key(&group_id) {
            order.push(group_id.clone());
        }
        members
            .entry(group_id)
            .or_default()
            .push(GroupMember { species, protein });
    }

    if members.is_empty() {
        return Err(InputError::Parse {
            path: path.display().to_string(),
            line: 0,
            message: "no core groups found".to_string(),
        });
    }

    let mut groups = Vec::with_capacity(order.len());
    for id in order {
        let group_members = members.remove(&id).unwrap_or_default();
        if group_members.len() < 2 {
            tracing::warn!(
                group = id.as_str(),
                "core group has fewer than two reference members; cutoffs will be unavailable"
            );
        }
        groups.push(CoreGroup {
            id,
            members: group_members,
        });
    }

    Ok(CoreSet::new(groups))
}
