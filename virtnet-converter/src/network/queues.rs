//! virtio-net multi-queue sizing.

use tracing::debug;

use crate::types::VirtualMachineInstance;
use crate::vcpu::{cpu_topology, requested_vcpus};

/// One queue pair per requested vCPU, capped at `max_queues`.
pub fn calculate_network_queues(vmi: &VirtualMachineInstance, max_queues: u32) -> u32 {
    cap_queues(requested_vcpus(&cpu_topology(vmi)), max_queues)
}

/// Cap a queue count at the tap device maximum.
pub fn cap_queues(requested: u32, max_queues: u32) -> u32 {
    if requested > max_queues {
        debug!(
            requested,
            max_queues,
            "Capped the number of queues to the maximum of tap device queues"
        );
        return max_queues;
    }
    requested
}
