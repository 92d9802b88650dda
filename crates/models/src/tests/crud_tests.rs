use anyhow::Result;
use common::types::{NewProvider, Weekday};
use sea_orm::{ActiveModelTrait, EntityTrait, TransactionTrait};
use uuid::Uuid;

use super::db_or_skip;
use crate::{provider, provider_service, service};

fn new_provider() -> NewProvider {
    let tag = Uuid::new_v4().simple().to_string();
    NewProvider {
        user_id: format!("user_{tag}"),
        company_name: format!("Co {}", &tag[..12]),
        type_of_provider: "Cleaning".into(),
        phone_number: "5551234".into(),
        experience_years: 2,
        hourly_rate: 150,
        bio: "Spotless".into(),
        operating_days: [Weekday::Monday].into_iter().collect(),
        start_time: "08:00".into(),
        end_time: "17:00".into(),
    }
}

/// Provider create, lookup by user id and company-name uniqueness check
#[tokio::test]
async fn test_provider_crud() -> Result<()> {
    let Some(db) = db_or_skip().await else { return Ok(()) };

    let input = new_provider();
    let created = provider::create(&db, &input).await?;
    assert_eq!(created.user_id, input.user_id);

    let found = provider::find_by_user_id(&db, &input.user_id).await?.expect("provider by user id");
    assert_eq!(found.id, created.id);
    assert_eq!(found.operating_days()?.names(), vec!["Monday"]);

    assert!(!provider::company_name_taken(&db, &input.company_name, created.id).await?);
    assert!(provider::company_name_taken(&db, &input.company_name, Uuid::new_v4()).await?);

    provider::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

/// The unique keys reject a second provider even without the pre-check
#[tokio::test]
async fn test_unique_keys_report_conflicts() -> Result<()> {
    let Some(db) = db_or_skip().await else { return Ok(()) };

    let first = provider::create(&db, &new_provider()).await?;
    let mut clash = new_provider();
    clash.company_name = first.company_name.clone();
    let err = provider::create(&db, &clash).await.expect_err("company name is unique");
    assert!(matches!(err, crate::errors::ModelError::Conflict(ref m) if m == "company already exists"), "{err}");

    provider::Entity::delete_by_id(first.id).exec(&db).await?;
    Ok(())
}

/// Services appended inside a transaction come back in list order
#[tokio::test]
async fn test_service_list_order() -> Result<()> {
    let Some(db) = db_or_skip().await else { return Ok(()) };

    let p = provider::create(&db, &new_provider()).await?;
    let mut ids = vec![];
    for i in 0..3 {
        let txn = db.begin().await?;
        let input = common::types::CreateServiceInput {
            user_id: p.user_id.clone(),
            image_url: format!("https://cdn.example.com/{i}.png"),
            service_name: format!("Service {i}"),
            type_of_service: "Cleaning".into(),
            description: "Thorough".into(),
            duration: 30 + i,
            price: 10.0,
            path: "/".into(),
        };
        let row = service::new_active(p.id, &input)?.insert(&txn).await?;
        provider_service::push(&txn, p.id, row.id).await?;
        txn.commit().await?;
        ids.push(row.id);
    }

    assert_eq!(provider_service::list_service_ids(&db, p.id).await?, ids);

    // cascade removes services and list entries
    provider::Entity::delete_by_id(p.id).exec(&db).await?;
    assert!(service::Entity::find_by_id(ids[0]).one(&db).await?.is_none());
    Ok(())
}

/// A rolled back create leaves neither the service nor its list entry
#[tokio::test]
async fn test_rollback_leaves_no_orphan() -> Result<()> {
    let Some(db) = db_or_skip().await else { return Ok(()) };

    let p = provider::create(&db, &new_provider()).await?;
    let txn = db.begin().await?;
    let input = common::types::CreateServiceInput {
        user_id: p.user_id.clone(),
        image_url: "https://cdn.example.com/x.png".into(),
        service_name: "Orphan check".into(),
        type_of_service: "Cleaning".into(),
        description: "Never committed".into(),
        duration: 30,
        price: 5.0,
        path: "/".into(),
    };
    let row = service::new_active(p.id, &input)?.insert(&txn).await?;
    txn.rollback().await?;

    assert!(service::Entity::find_by_id(row.id).one(&db).await?.is_none());
    assert!(provider_service::list_service_ids(&db, p.id).await?.is_empty());

    provider::Entity::delete_by_id(p.id).exec(&db).await?;
    Ok(())
}
