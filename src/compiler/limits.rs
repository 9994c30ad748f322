//! Resource limit merging
//!
//! A non-zero process-wide default replaces the step's own value, even a
//! different non-zero one. It is an override, not a ceiling.

use crate::pipeline::ResourceLimits;

fn pick(default: i64, declared: i64) -> i64 {
    if default == 0 { declared } else { default }
}

/// Returns the effective limits of a step, field by field
#[must_use]
pub fn merge_limits(defaults: &ResourceLimits, declared: &ResourceLimits) -> ResourceLimits {
    if defaults.is_unset() {
        return declared.clone();
    }
    ResourceLimits {
        mem_swap_limit: pick(defaults.mem_swap_limit, declared.mem_swap_limit),
        mem_limit: pick(defaults.mem_limit, declared.mem_limit),
        shm_size: pick(defaults.shm_size, declared.shm_size),
        cpu_quota: pick(defaults.cpu_quota, declared.cpu_quota),
        cpu_shares: pick(defaults.cpu_shares, declared.cpu_shares),
        cpu_set: if defaults.cpu_set.is_empty() {
            declared.cpu_set.clone()
        } else {
            defaults.cpu_set.clone()
        },
    }
}
