use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use super::types::{ContainerRow, ImageRow, ImageSummary, SearchHit};

/// Decode `--format '{{json .}}'` output: one JSON object per non-blank line.
pub fn parse_rows<T: DeserializeOwned>(output: &str) -> Result<Vec<T>> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("unexpected docker output on line {}: {line}", i + 1))
        })
        .collect()
}

/// Group `docker image ls` rows by image ID, keeping first-seen order.
pub fn group_images(rows: Vec<ImageRow>) -> Vec<ImageSummary> {
    let mut images: Vec<ImageSummary> = Vec::new();
    for row in rows {
        let tag = image_tag(&row);
        match images.iter_mut().find(|img| img.id == row.id) {
            Some(img) => img.tags.extend(tag),
            None => images.push(ImageSummary {
                id: row.id,
                tags: tag.into_iter().collect(),
            }),
        }
    }
    images
}

/// Keep rows whose repository contains `term`, ignoring case.
///
/// Done here rather than with `--filter reference=`, whose glob never matches
/// across `/` and so misses namespaced images like `bitnami/redis`.
pub fn filter_images(rows: Vec<ImageRow>, term: &str) -> Vec<ImageRow> {
    let needle = term.to_lowercase();
    rows.into_iter()
        .filter(|row| row.repository.to_lowercase().contains(&needle))
        .collect()
}

fn image_tag(row: &ImageRow) -> Option<String> {
    let none = |s: &str| s.is_empty() || s == "<none>";
    if none(&row.repository) {
        return None;
    }
    if none(&row.tag) {
        return Some(row.repository.clone());
    }
    Some(format!("{}:{}", row.repository, row.tag))
}

pub fn image_lines(images: &[ImageSummary]) -> Vec<String> {
    if images.is_empty() {
        return vec!["No images found.".to_string()];
    }
    images
        .iter()
        .map(|img| format!("Image ID: {}, Tags: [{}]", img.id, img.tags.join(", ")))
        .collect()
}

pub fn container_lines(containers: &[ContainerRow]) -> Vec<String> {
    if containers.is_empty() {
        return vec!["No running containers.".to_string()];
    }
    containers
        .iter()
        .map(|c| format!("Container ID: {}, Name: {}", c.id, c.name()))
        .collect()
}

pub fn search_lines(hits: &[SearchHit]) -> Vec<String> {
    if hits.is_empty() {
        return vec!["No matching images.".to_string()];
    }
    hits.iter()
        .map(|hit| {
            let mut line = format!("Image Name: {}", hit.name);
            if hit.is_official {
                line.push_str(" [official]");
            }
            line.push_str(&format!(", Description: {}", hit.description));
            if hit.star_count > 0 {
                line.push_str(&format!(" (★ {})", hit.star_count));
            }
            line
        })
        .collect()
}
