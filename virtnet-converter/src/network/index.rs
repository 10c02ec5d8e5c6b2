//! Network source validation and name index.

use std::collections::{HashMap, HashSet};

use crate::error::{ConverterError, Result};
use crate::types::Network;

/// Check that every network has exactly one source (pod or multus).
///
/// Fails on the first offending network.
pub fn validate_networks_types(networks: &[Network]) -> Result<()> {
    for network in networks {
        match (&network.pod, &network.multus) {
            (Some(_), Some(_)) => {
                return Err(ConverterError::Configuration(format!(
                    "network {} must have only one network type",
                    network.name
                )));
            }
            (None, None) => {
                return Err(ConverterError::Configuration(format!(
                    "network {} must have a network type",
                    network.name
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Index networks by name. The index owns copies of the networks.
///
/// On duplicate names the later network wins; see [`duplicate_network_names`].
pub fn index_networks_by_name(networks: &[Network]) -> HashMap<String, Network> {
    networks
        .iter()
        .map(|network| (network.name.clone(), network.clone()))
        .collect()
}

/// Names declared more than once, in order of their second occurrence.
pub fn duplicate_network_names(networks: &[Network]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for network in networks {
        if !seen.insert(network.name.as_str()) && !duplicates.contains(&network.name) {
            duplicates.push(network.name.clone());
        }
    }
    duplicates
}
