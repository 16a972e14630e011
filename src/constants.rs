// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Argo CD conventions used in generated objects
pub mod argocd {
    /// Label marking a Secret as an Argo CD repository credential
    pub const SECRET_TYPE_LABEL: &str = "argocd.argoproj.io/secret-type";
    pub const SECRET_TYPE_REPOSITORY: &str = "repository";
    /// Repository type stored in the credential secret
    pub const REPOSITORY_TYPE_GIT: &str = "git";

    pub const DEFAULT_NAMESPACE: &str = "argocd";
    pub const DEFAULT_PROJECT: &str = "default";
    /// The API server as seen from inside the cluster Argo CD runs in
    pub const IN_CLUSTER_SERVER: &str = "https://kubernetes.default.svc";
    pub const DEFAULT_SECRET_NAME: &str = "mta-migration";

    /// Directory generator placeholders, resolved by Argo CD, never by us
    pub const PATH_BASENAME_TOKEN: &str = "{{path.basename}}";
    pub const PATH_TOKEN: &str = "{{path}}";
}

/// Flux conventions
pub mod flux {
    pub const DEFAULT_NAMESPACE: &str = "flux-system";
    /// Directory holding Flux's own manifests, never migrated
    pub const SYSTEM_DIR: &str = "flux-system";
    /// Secret key holding the SSH private key of a GitRepository
    pub const IDENTITY_KEY: &str = "identity";
    pub const GIT_REPOSITORY_KIND: &str = "GitRepository";
    pub const HELM_REPOSITORY_KIND: &str = "HelmRepository";
    /// Chart version Flux assumes when none is pinned
    pub const ANY_CHART_VERSION: &str = "*";
    /// Git revision Argo CD uses when the source pins nothing
    pub const DEFAULT_GIT_REVISION: &str = "HEAD";

    /// Label selecting the CRDs installed by Flux
    pub const PART_OF_SELECTOR: &str = "app.kubernetes.io/part-of=flux";
    /// Label key carrying the namespace Flux was installed into
    pub const INSTANCE_LABEL: &str = "app.kubernetes.io/instance";
}
