// ABOUTME: Pure planning helpers for recipe writes: step numbering, image correlation, detail merge
// ABOUTME: Computes the final rows to insert from a request plus the optional prior state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::Path;

use crate::errors::{AppError, AppResult};
use crate::models::{IngredientDetailRequest, LineDetail, Step, StepRequest};
use crate::slug::normalize;

use super::prior_state::PriorState;

/// Step number an image upload belongs to, read from its filename stem
///
/// Accepts `step<n>`, `step-<n>`, and `step_<n>` in any letter case.
#[must_use]
pub fn correlate_step_number(filename: &str) -> Option<i32> {
    let stem = Path::new(filename).file_stem()?.to_str()?.to_ascii_lowercase();
    let rest = stem.strip_prefix("step")?;
    let digits = rest.strip_prefix(['-', '_']).unwrap_or(rest);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|n| *n > 0)
}

/// Final step number of every step request, assigning the 1-based position when absent
///
/// # Errors
///
/// Returns `InvalidInput` for a declared number below 1 and
/// `MissingRequiredField` for a blank instruction.
pub fn assign_step_numbers(requests: &[StepRequest]) -> AppResult<Vec<i32>> {
    requests
        .iter()
        .enumerate()
        .map(|(index, request)| {
            if request.instruction.trim().is_empty() {
                return Err(AppError::missing_field(format!("steps[{index}].instruction")));
            }
            match request.step_number {
                Some(n) if n < 1 => Err(AppError::invalid_input(format!(
                    "Step number must be positive, got {n} at position {}",
                    index + 1
                ))),
                Some(n) => Ok(n),
                None => i32::try_from(index + 1)
                    .map_err(|_| AppError::invalid_input("Too many steps")),
            }
        })
        .collect()
}

/// Build the step rows to insert
///
/// Image precedence per step: a freshly uploaded image for its number, then
/// the path in the step request, then the prior image stored under the same number.
#[must_use]
pub fn build_steps<S: BuildHasher>(
    requests: &[StepRequest],
    numbers: &[i32],
    uploaded: &HashMap<i32, String, S>,
    prior: Option<&PriorState>,
) -> Vec<Step> {
    requests
        .iter()
        .zip(numbers)
        .map(|(request, &step_number)| Step {
            step_number,
            instruction: request.instruction.trim().to_owned(),
            image: uploaded
                .get(&step_number)
                .cloned()
                .or_else(|| request.image.clone().filter(|path| !path.is_empty()))
                .or_else(|| prior.and_then(|p| p.step_image(step_number)).map(str::to_owned)),
            timer_minutes: request.timer_minutes,
            temperature_celsius: request.temperature_celsius,
        })
        .collect()
}

/// Carry stored steps forward, swapping in freshly uploaded images by step number
#[must_use]
pub fn carry_steps_forward<S: BuildHasher>(
    prior: &PriorState,
    uploaded: &HashMap<i32, String, S>,
) -> Vec<Step> {
    prior
        .steps
        .iter()
        .map(|step| Step {
            image: uploaded
                .get(&step.step_number)
                .cloned()
                .or_else(|| step.image.clone()),
            ..step.clone()
        })
        .collect()
}

/// Attributes of every final ingredient line
///
/// For each id the attributes are merged field by field: the by-id detail
/// first, then the inline detail supplied with a by-name ingredient, then
/// (on update) the previously stored line.
#[must_use]
pub fn merge_line_details<S: BuildHasher>(
    ingredient_ids: &[i64],
    inline: &HashMap<i64, LineDetail, S>,
    by_id: &[IngredientDetailRequest],
    prior: Option<&PriorState>,
) -> Vec<(i64, LineDetail)> {
    let empty = LineDetail::default();
    ingredient_ids
        .iter()
        .map(|&id| {
            let requested = by_id
                .iter()
                .find(|d| d.ingredient_id == id)
                .map(|d| d.detail.clone())
                .unwrap_or_default();
            let detail = requested
                .or(inline.get(&id).unwrap_or(&empty))
                .or(prior.and_then(|p| p.line_detail(id)).unwrap_or(&empty));
            (id, detail)
        })
        .collect()
}

/// Slug for a new recipe: the explicit one when non-blank, else derived from the title
#[must_use]
pub fn slug_for_create(title: &str, requested: Option<&str>) -> String {
    requested
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| normalize(Some(title)).unwrap_or_default(), str::to_owned)
}

/// Slug after an update
///
/// An explicit non-blank slug wins. Otherwise the slug is regenerated when the
/// title changed to a non-blank value or the stored slug is empty.
#[must_use]
pub fn slug_for_update(
    stored_title: &str,
    stored_slug: &str,
    new_title: Option<&str>,
    requested: Option<&str>,
) -> String {
    if let Some(slug) = requested.map(str::trim).filter(|s| !s.is_empty()) {
        return slug.to_owned();
    }

    let retitled = new_title
        .filter(|t| !t.trim().is_empty())
        .filter(|t| *t != stored_title);

    match retitled {
        Some(title) => normalize(Some(title)).unwrap_or_default(),
        None if stored_slug.is_empty() => {
            normalize(Some(new_title.unwrap_or(stored_title))).unwrap_or_default()
        }
        None => stored_slug.to_owned(),
    }
}
