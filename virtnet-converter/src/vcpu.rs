//! Requested vCPU count.

use crate::types::{CpuTopology, VirtualMachineInstance};

/// Number of vCPUs a topology asks for. Unset (zero) dimensions count as 1.
pub fn requested_vcpus(topology: &CpuTopology) -> u32 {
    let dim = |n: u32| n.max(1);
    dim(topology.sockets)
        .saturating_mul(dim(topology.cores))
        .saturating_mul(dim(topology.threads))
}

/// CPU topology of a VMI, defaulting to a single vCPU.
pub fn cpu_topology(vmi: &VirtualMachineInstance) -> CpuTopology {
    vmi.spec.domain.cpu.unwrap_or_default()
}
