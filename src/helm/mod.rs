//! Helm release listing
//!
//! Helm 3 stores one Secret per release revision, named
//! `sh.helm.release.v1.{name}.v{version}`, whose `release` key holds a
//! base64 payload that is usually gzip-compressed JSON. Listing releases is
//! therefore a Secret list plus a decode:
//! base64 → gzip detection → decompress → JSON parse → extract fields.

use anyhow::{Context, Result};
use base64::Engine;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Api, ListParams};
use serde::Serialize;

/// Secret type Helm 3 uses for release storage
const HELM_SECRET_TYPE: &str = "helm.sh/release.v1";

/// One installed Helm release (latest revision)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmReleaseSnapshot {
    pub name: String,
    pub namespace: String,
    pub revision: i64,
    pub chart: String,
    pub status: String,
    pub updated: Option<String>,
}

/// List the releases installed in a namespace, newest revision per release.
pub async fn list_releases(
    client: &kube::Client,
    namespace: &str,
) -> Result<Vec<HelmReleaseSnapshot>> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let params = ListParams::default().labels("owner=helm");
    let list = secrets
        .list(&params)
        .await
        .context("Failed to list Helm storage secrets")?;

    let mut releases: Vec<HelmReleaseSnapshot> = Vec::new();
    for secret in &list.items {
        if secret.type_.as_deref() != Some(HELM_SECRET_TYPE) {
            continue;
        }
        let Some(payload) = secret.data.as_ref().and_then(|data| data.get("release")) else {
            continue;
        };
        match decode_release_payload(&payload.0) {
            Ok(release) => {
                // Keep only the newest revision per release name
                match releases.iter().position(|r| r.name == release.name) {
                    Some(i) if releases[i].revision < release.revision => releases[i] = release,
                    Some(_) => {}
                    None => releases.push(release),
                }
            }
            Err(e) => {
                let secret_name = secret.metadata.name.as_deref().unwrap_or("<unnamed>");
                tracing::warn!(secret = %secret_name, error = %e, "skipping undecodable Helm secret");
            }
        }
    }

    releases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(releases)
}

/// Decode one Helm storage payload (the Secret's `release` value, already
/// un-base64'd once by the API machinery) into a release snapshot.
pub fn decode_release_payload(raw: &[u8]) -> Result<HelmReleaseSnapshot> {
    // Helm double-encodes: the Secret value is itself base64 text
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(raw)
        .context("Failed to decode base64 release data")?;

    // Check for gzip magic bytes (0x1f, 0x8b, 0x08)
    let is_gzipped =
        decoded.len() >= 3 && decoded[0] == 0x1f && decoded[1] == 0x8b && decoded[2] == 0x08;

    let json_bytes = if is_gzipped {
        use std::io::Read;
        let mut decoder = flate2::read::GzDecoder::new(&decoded[..]);
        let mut buf = Vec::new();
        decoder
            .read_to_end(&mut buf)
            .context("Failed to decompress gzip release data")?;
        buf
    } else {
        decoded
    };

    let release: serde_json::Value =
        serde_json::from_slice(&json_bytes).context("Failed to parse release JSON")?;

    let name = release
        .get("name")
        .and_then(|n| n.as_str())
        .context("Release missing name")?
        .to_string();
    let namespace = release
        .get("namespace")
        .and_then(|n| n.as_str())
        .unwrap_or_default()
        .to_string();
    let revision = release
        .get("version")
        .and_then(|v| v.as_i64())
        .context("Release missing version")?;

    let chart = release
        .get("chart")
        .and_then(|c| c.get("metadata"))
        .map(|meta| {
            let chart_name = meta.get("name").and_then(|n| n.as_str()).unwrap_or("?");
            let chart_version = meta.get("version").and_then(|v| v.as_str()).unwrap_or("?");
            format!("{}-{}", chart_name, chart_version)
        })
        .unwrap_or_else(|| "?".to_string());

    let info = release.get("info");
    let status = info
        .and_then(|i| i.get("status"))
        .and_then(|s| s.as_str())
        .unwrap_or("unknown")
        .to_string();
    let updated = info
        .and_then(|i| i.get("last_deployed"))
        .and_then(|t| t.as_str())
        .map(|t| t.to_string());

    Ok(HelmReleaseSnapshot {
        name,
        namespace,
        revision,
        chart,
        status,
        updated,
    })
}
