//! Backend option translation

use crate::pipeline::{
    BackendOptions, ContainerBackendOptions, KubernetesBackendOptions, KubernetesOptions,
    Resources, SecProfile, SecProfileSpec, SecurityContext, SecurityContextSpec, Toleration,
    TolerationSpec,
};

/// Translates the options declared on a container
#[must_use]
pub fn convert_backend_options(options: &ContainerBackendOptions) -> BackendOptions {
    BackendOptions {
        kubernetes: convert_kubernetes_options(&options.kubernetes),
    }
}

/// Translates declared Kubernetes options into step options
#[must_use]
pub fn convert_kubernetes_options(options: &KubernetesOptions) -> KubernetesBackendOptions {
    KubernetesBackendOptions {
        resources: Resources {
            requests: options.resources.requests.clone(),
            limits: options.resources.limits.clone(),
        },
        service_account_name: options.service_account_name.clone(),
        node_selector: options.node_selector.clone(),
        tolerations: options.tolerations.iter().map(convert_toleration).collect(),
        security_context: options.security_context.as_ref().map(convert_security_context),
    }
}

fn convert_toleration(toleration: &TolerationSpec) -> Toleration {
    Toleration {
        key: toleration.key.clone(),
        operator: toleration.operator,
        value: toleration.value.clone(),
        effect: toleration.effect,
        toleration_seconds: toleration.toleration_seconds,
    }
}

fn convert_security_context(context: &SecurityContextSpec) -> SecurityContext {
    SecurityContext {
        privileged: context.privileged,
        run_as_non_root: context.run_as_non_root,
        run_as_user: context.run_as_user,
        run_as_group: context.run_as_group,
        fs_group: context.fs_group,
        seccomp_profile: context.seccomp_profile.as_ref().map(convert_profile),
        apparmor_profile: context.apparmor_profile.as_ref().map(convert_profile),
    }
}

fn convert_profile(profile: &SecProfileSpec) -> SecProfile {
    SecProfile {
        profile_type: profile.profile_type,
        localhost_profile: profile.localhost_profile.clone(),
    }
}
