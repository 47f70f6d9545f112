// ABOUTME: Integration tests for recipe creation through the write coordinator
// ABOUTME: Covers slug derivation, catalog reuse by name, validation, and step image correlation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::too_many_lines, missing_docs)]

mod common;

use anyhow::Result;
use common::{create_test_engine, named, step};
use recipe_hub::database::activity;
use recipe_hub::errors::ErrorCode;
use recipe_hub::models::{
    CreateRecipeRequest, Difficulty, LineDetail, NewIngredientRequest, RecipeStatus, StepRequest,
};
use recipe_hub::storage::ImageUpload;

fn request(user_id: i64, title: &str) -> CreateRecipeRequest {
    CreateRecipeRequest {
        user_id,
        title: title.to_owned(),
        ..CreateRecipeRequest::default()
    }
}

#[tokio::test]
async fn test_create_derives_slug_and_defaults() -> Result<()> {
    let engine = create_test_engine().await?;

    let recipe = engine
        .service
        .create_recipe(request(engine.user_id, "Bánh Mì Kẹp Thịt"), None, vec![])
        .await?;

    assert_eq!(recipe.slug, "banh-mi-kep-thit");
    assert_eq!(recipe.status, RecipeStatus::Pending);
    assert!(!recipe.is_published);
    assert_eq!(recipe.view_count, 0);
    assert_eq!(recipe.author_name.as_deref(), Some("Nguyễn Linh"));
    assert!(recipe.author.is_none());
    assert!(recipe.steps.is_empty());
    assert!(recipe.featured_image_url.is_none());
    Ok(())
}

#[tokio::test]
async fn test_create_keeps_explicit_slug() -> Result<()> {
    let engine = create_test_engine().await?;

    let mut req = request(engine.user_id, "Phở Bò");
    req.slug = Some("  grandmas-pho ".into());
    let recipe = engine.service.create_recipe(req, None, vec![]).await?;

    assert_eq!(recipe.slug, "grandmas-pho");
    Ok(())
}

#[tokio::test]
async fn test_create_with_full_aggregate() -> Result<()> {
    let engine = create_test_engine().await?;

    let mut req = request(engine.user_id, "Cơm Tấm");
    req.difficulty = Some(Difficulty::Medium);
    req.servings = Some(4);
    req.steps = vec![
        step("Marinate the pork"),
        step("Grill over charcoal"),
        step("Serve with broken rice"),
    ];
    req.new_categories = vec![named("Vietnamese")];
    req.new_tags = vec![named("Grilled"), named("Pork")];
    req.new_ingredients = vec![
        NewIngredientRequest {
            name: "Pork chop".into(),
            detail: LineDetail {
                quantity: Some("4".into()),
                unit: Some("pieces".into()),
                notes: None,
                display_order: Some(1),
            },
        },
        NewIngredientRequest {
            name: "Broken rice".into(),
            detail: LineDetail {
                quantity: Some("2".into()),
                unit: Some("cups".into()),
                notes: Some("rinsed".into()),
                display_order: Some(2),
            },
        },
    ];

    let recipe = engine.service.create_recipe(req, None, vec![]).await?;

    let numbers: Vec<i32> = recipe.steps.iter().map(|s| s.step_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(recipe.steps[1].instruction, "Grill over charcoal");

    assert_eq!(recipe.categories.len(), 1);
    assert_eq!(recipe.categories[0].slug, "vietnamese");
    assert_eq!(recipe.tags.len(), 2);

    assert_eq!(recipe.ingredients.len(), 2);
    assert_eq!(recipe.ingredients[0].ingredient_name, "Pork chop");
    assert_eq!(recipe.ingredients[1].detail.unit.as_deref(), Some("cups"));
    assert_eq!(
        recipe.ingredients[1].detail.notes.as_deref(),
        Some("rinsed")
    );

    let log = {
        let mut conn = engine.database.acquire().await?;
        activity::list_for_recipe(&mut conn, recipe.id).await?
    };
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].action, "CREATE");
    assert_eq!(log[0].user_id, engine.user_id);
    Ok(())
}

#[tokio::test]
async fn test_inline_category_reused_case_insensitively() -> Result<()> {
    let engine = create_test_engine().await?;

    let mut first = request(engine.user_id, "Pad Thai");
    first.new_categories = vec![named("Asian")];
    let first = engine.service.create_recipe(first, None, vec![]).await?;
    assert_eq!(
        engine.count_for_recipe("recipe_categories", first.id).await?,
        1
    );

    let mut second = request(engine.user_id, "Ramen");
    second.new_categories = vec![named("  asian ")];
    let second = engine.service.create_recipe(second, None, vec![]).await?;

    assert_eq!(engine.count_all("categories").await?, 1);
    assert_eq!(second.categories[0].id, first.categories[0].id);
    assert_eq!(second.categories[0].name, "Asian");
    Ok(())
}

#[tokio::test]
async fn test_duplicate_inline_names_create_one_entry() -> Result<()> {
    let engine = create_test_engine().await?;

    let mut req = request(engine.user_id, "Hot Wings");
    req.new_tags = vec![named("Spicy"), named("SPICY"), named("spicy")];
    let recipe = engine.service.create_recipe(req, None, vec![]).await?;

    assert_eq!(engine.count_all("tags").await?, 1);
    assert_eq!(recipe.tags.len(), 1);
    assert_eq!(recipe.tags[0].name, "Spicy");
    Ok(())
}

#[tokio::test]
async fn test_inline_name_and_existing_id_link_once() -> Result<()> {
    let engine = create_test_engine().await?;

    let mut first = request(engine.user_id, "Miso Soup");
    first.new_tags = vec![named("Umami")];
    let first = engine.service.create_recipe(first, None, vec![]).await?;
    let umami = first.tags[0].id;

    let mut second = request(engine.user_id, "Dashi");
    second.tag_ids = vec![umami, umami];
    second.new_tags = vec![named("umami")];
    let second = engine.service.create_recipe(second, None, vec![]).await?;

    assert_eq!(engine.count_for_recipe("recipe_tags", second.id).await?, 1);
    assert_eq!(second.tags[0].id, umami);
    Ok(())
}

#[tokio::test]
async fn test_unknown_reference_rolls_back_everything() -> Result<()> {
    let engine = create_test_engine().await?;

    let mut req = request(engine.user_id, "Ghost Recipe");
    req.steps = vec![step("Nothing to see")];
    req.new_tags = vec![named("Phantom")];
    req.category_ids = vec![999];

    let error = engine
        .service
        .create_recipe(req, None, vec![])
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    assert_eq!(error.resource_id.as_deref(), Some("999"));
    assert_eq!(engine.count_all("recipes").await?, 0);
    assert_eq!(engine.count_all("recipe_steps").await?, 0);
    assert_eq!(engine.count_all("tags").await?, 0);
    assert_eq!(engine.count_all("activity_logs").await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_invalid_steps_rejected_before_any_write() -> Result<()> {
    let engine = create_test_engine().await?;

    let mut req = request(engine.user_id, "Bad Steps");
    req.steps = vec![StepRequest {
        step_number: Some(0),
        instruction: "Zero".into(),
        ..StepRequest::default()
    }];
    let error = engine
        .service
        .create_recipe(req, Some(ImageUpload::new("cover.jpg", &b"jpeg"[..])), vec![])
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    let mut req = request(engine.user_id, "Blank Step");
    req.steps = vec![step("   ")];
    let error = engine
        .service
        .create_recipe(req, None, vec![])
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::MissingRequiredField);

    assert_eq!(engine.count_all("recipes").await?, 0);
    assert_eq!(engine.blob_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_blank_inline_name_rejected() -> Result<()> {
    let engine = create_test_engine().await?;

    let mut req = request(engine.user_id, "Nameless");
    req.new_ingredients = vec![NewIngredientRequest {
        name: "  ".into(),
        detail: LineDetail::default(),
    }];
    let error = engine
        .service
        .create_recipe(req, None, vec![])
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert_eq!(engine.count_all("ingredients").await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_step_images_correlate_by_filename() -> Result<()> {
    let engine = create_test_engine().await?;

    let mut req = request(engine.user_id, "Banh Xeo");
    req.steps = vec![step("Make batter"), step("Fry crepes")];

    let recipe = engine
        .service
        .create_recipe(
            req,
            Some(ImageUpload::new("cover.JPG", &b"cover"[..])),
            vec![
                ImageUpload::new("step_2.jpg", &b"two"[..]),
                ImageUpload::new("Step-2.png", &b"second two"[..]),
                ImageUpload::new("step_9.jpg", &b"nine"[..]),
                ImageUpload::new("random.jpg", &b"nope"[..]),
            ],
        )
        .await?;

    assert!(recipe.steps[0].image_url.is_none());
    let step_two = recipe.steps[1].image_url.as_deref().unwrap();
    assert!(step_two.starts_with("/media/"));
    assert!(step_two.ends_with(".jpg"));

    let cover = recipe.featured_image_url.as_deref().unwrap();
    assert!(cover.starts_with("/media/") && cover.ends_with(".jpg"));

    // Featured image plus the first step_2 upload only
    assert_eq!(engine.blob_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_explicit_step_numbers_order_the_steps() -> Result<()> {
    let engine = create_test_engine().await?;

    let mut req = request(engine.user_id, "Reordered");
    req.steps = vec![
        StepRequest {
            step_number: Some(3),
            instruction: "Third".into(),
            ..StepRequest::default()
        },
        StepRequest {
            step_number: Some(1),
            instruction: "First".into(),
            image: Some("steps/first.png".into()),
            ..StepRequest::default()
        },
    ];
    let recipe = engine.service.create_recipe(req, None, vec![]).await?;

    assert_eq!(recipe.steps[0].instruction, "First");
    assert_eq!(
        recipe.steps[0].image_url.as_deref(),
        Some("/media/steps/first.png")
    );
    assert_eq!(recipe.steps[1].step_number, 3);
    Ok(())
}

#[tokio::test]
async fn test_admin_read_includes_author_record() -> Result<()> {
    let engine = create_test_engine().await?;
    let recipe = engine
        .service
        .create_recipe(request(engine.user_id, "Gỏi Cuốn"), None, vec![])
        .await?;

    let public = engine.service.get_recipe_by_id(recipe.id).await?;
    assert!(public.author.is_none());

    let admin = engine.service.get_recipe_for_admin(recipe.id).await?;
    let author = admin.author.unwrap();
    assert_eq!(author.id, engine.user_id);
    assert_eq!(author.username, "linh");
    assert_eq!(
        author.avatar_url.as_deref(),
        Some("/media/avatars/linh.png")
    );
    assert_eq!(admin.author_name.as_deref(), Some("Nguyễn Linh"));
    Ok(())
}
