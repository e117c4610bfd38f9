//! Flat connection list to nested connection map.

use crate::document::{ConnectionMap, ConnectionTarget};
use flowpress_workflow::Connection;

/// Nests connections by source node, connection type and output index.
///
/// Missing output indexes below the highest one used are filled with empty
/// branches, so output indexes are expected to have passed validation
/// (below [`MAX_OUTPUTS`](crate::MAX_OUTPUTS)). Targets within a branch keep
/// the input order.
#[must_use]
pub fn reshape(connections: &[Connection]) -> ConnectionMap {
    let mut map = ConnectionMap::new();
    for conn in connections {
        let branches = map.entry(&conn.from).branches_mut(conn.connection_type);
        let output = conn.output_index as usize;
        if branches.len() <= output {
            branches.resize_with(output + 1, Vec::new);
        }
        branches[output].push(ConnectionTarget {
            node: conn.to.clone(),
            connection_type: conn.connection_type,
            index: conn.input_index,
        });
    }
    map
}
