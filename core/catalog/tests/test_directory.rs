use std::collections::BTreeSet;
use tempdir::TempDir;

use orgdir_catalog::dao::{ActivityDao, OrganizationDao};
use orgdir_catalog::seed::seed;
use orgdir_catalog::{CatalogService, Config, Directory, Error};
use orgdir_model::params::NearbyParams;
use orgdir_model::{Building, NewActivity, NewBuilding, NewOrganization, Organization};
use orgdir_persistence::DbExecutor;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn directory(dir: &TempDir) -> anyhow::Result<Directory> {
    init_logger();
    let db = DbExecutor::from_data_dir(dir.path(), "orgdir")?;
    CatalogService::apply_migrations(&db)?;
    Ok(Directory::new(db, Config::default()))
}

async fn building(directory: &Directory, latitude: f64, longitude: f64) -> anyhow::Result<Building> {
    Ok(directory
        .create_building(NewBuilding {
            address: format!("{}, {}", latitude, longitude),
            latitude,
            longitude,
        })
        .await?)
}

async fn organization(
    directory: &Directory,
    name: &str,
    building_id: i32,
    activity_ids: Vec<i32>,
) -> anyhow::Result<Organization> {
    Ok(directory
        .create_organization(NewOrganization {
            name: name.into(),
            building_id,
            phones: vec![],
            activity_ids,
        })
        .await?)
}

fn names(organizations: &[Organization]) -> Vec<&str> {
    organizations.iter().map(|o| o.name.as_str()).collect()
}

async fn organization_count(directory: &Directory) -> anyhow::Result<usize> {
    let all = directory
        .db()
        .as_dao::<OrganizationDao>()
        .list_by_name_substring("")
        .await?;
    Ok(all.len())
}

#[actix_rt::test]
async fn child_depth_follows_parent() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;

    let it = directory.create_activity(NewActivity::root("IT")).await?;
    let web = directory.create_activity(NewActivity::child("Web", it.id)).await?;
    let frontend = directory
        .create_activity(NewActivity::child("Frontend", web.id))
        .await?;

    assert_eq!((it.depth, web.depth, frontend.depth), (1, 2, 3));
    assert_eq!(web.parent_id, Some(it.id));
    assert_eq!(frontend.parent_id, Some(web.id));
    Ok(())
}

#[actix_rt::test]
async fn too_deep_activity_is_rejected_without_a_row() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;

    let a = directory.create_activity(NewActivity::root("A")).await?;
    let b = directory.create_activity(NewActivity::child("B", a.id)).await?;
    let c = directory.create_activity(NewActivity::child("C", b.id)).await?;

    let result = directory.create_activity(NewActivity::child("D", c.id)).await;
    match result {
        Err(Error::BadRequest(message)) => assert_eq!(message, "Max nesting depth is 3"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(directory.activities().await?.len(), 3);
    Ok(())
}

#[actix_rt::test]
async fn configured_depth_limit_applies() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let shallow = directory(&dir)?;
    let shallow = Directory::new(shallow.db().clone(), Config::default().max_activity_depth(1));

    let root = shallow.create_activity(NewActivity::root("Root")).await?;
    let result = shallow.create_activity(NewActivity::child("Child", root.id)).await;
    assert!(matches!(result, Err(Error::BadRequest(_))));
    Ok(())
}

#[actix_rt::test]
async fn missing_parent_is_not_found() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;

    let result = directory.create_activity(NewActivity::child("Orphan", 42)).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
    assert!(directory.activities().await?.is_empty());
    Ok(())
}

#[actix_rt::test]
async fn descendant_ids_of_leaf_and_subtree() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;

    let a = directory.create_activity(NewActivity::root("A")).await?;
    let b = directory.create_activity(NewActivity::child("B", a.id)).await?;
    let c = directory.create_activity(NewActivity::child("C", b.id)).await?;
    let other = directory.create_activity(NewActivity::root("Other")).await?;

    let dao = directory.db().as_dao::<ActivityDao>();
    assert_eq!(
        dao.collect_descendant_ids(a.id).await?,
        vec![a.id, b.id, c.id].into_iter().collect::<BTreeSet<_>>()
    );
    assert_eq!(
        dao.collect_descendant_ids(c.id).await?,
        vec![c.id].into_iter().collect::<BTreeSet<_>>()
    );
    assert_eq!(dao.children_of(a.id).await?, vec![b.id]);
    assert!(dao.children_of(other.id).await?.is_empty());
    Ok(())
}

#[actix_rt::test]
async fn by_activity_covers_descendants_once() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;
    let site = building(&directory, 55.75, 37.61).await?;

    let food = directory.create_activity(NewActivity::root("Food")).await?;
    let meat = directory.create_activity(NewActivity::child("Meat", food.id)).await?;
    let dairy = directory.create_activity(NewActivity::child("Dairy", food.id)).await?;
    let cars = directory.create_activity(NewActivity::root("Cars")).await?;

    organization(&directory, "Both", site.id, vec![meat.id, dairy.id]).await?;
    organization(&directory, "Milk", site.id, vec![dairy.id]).await?;
    organization(&directory, "Garage", site.id, vec![cars.id]).await?;

    let found = directory.organizations_by_activity(food.id).await?;
    assert_eq!(names(&found), vec!["Both", "Milk"]);

    let found = directory.organizations_by_activity(dairy.id).await?;
    assert_eq!(names(&found), vec!["Both", "Milk"]);

    let found = directory.organizations_by_activity(meat.id).await?;
    assert_eq!(names(&found), vec!["Both"]);

    assert!(matches!(
        directory.organizations_by_activity(1000).await,
        Err(Error::NotFound(_))
    ));
    Ok(())
}

#[actix_rt::test]
async fn by_building() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;
    let first = building(&directory, 55.75, 37.61).await?;
    let second = building(&directory, 59.93, 30.32).await?;
    let empty = building(&directory, 0.0, 0.0).await?;

    organization(&directory, "One", first.id, vec![]).await?;
    organization(&directory, "Two", second.id, vec![]).await?;
    organization(&directory, "Three", first.id, vec![]).await?;

    let found = directory.organizations_by_building(first.id).await?;
    assert_eq!(names(&found), vec!["One", "Three"]);
    assert!(found.iter().all(|o| o.building == first));

    assert!(directory.organizations_by_building(empty.id).await?.is_empty());
    assert!(matches!(
        directory.organizations_by_building(1000).await,
        Err(Error::NotFound(_))
    ));
    Ok(())
}

#[actix_rt::test]
async fn unknown_building_persists_nothing() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;

    let result = directory
        .create_organization(NewOrganization {
            name: "Nowhere".into(),
            building_id: 7,
            phones: vec!["1-111".into()],
            activity_ids: vec![],
        })
        .await;
    match result {
        Err(Error::NotFound(message)) => assert_eq!(message, "Building not found"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(organization_count(&directory).await?, 0);
    Ok(())
}

#[actix_rt::test]
async fn partially_unknown_activities_persist_nothing() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;
    let site = building(&directory, 55.75, 37.61).await?;
    let known = directory.create_activity(NewActivity::root("Known")).await?;

    let result = directory
        .create_organization(NewOrganization {
            name: "Half".into(),
            building_id: site.id,
            phones: vec!["1-111".into()],
            activity_ids: vec![known.id, known.id + 100],
        })
        .await;
    match result {
        Err(Error::BadRequest(message)) => assert_eq!(message, "Some activity_ids not found"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(organization_count(&directory).await?, 0);
    Ok(())
}

#[actix_rt::test]
async fn repeated_activity_ids_persist_nothing() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;
    let site = building(&directory, 55.75, 37.61).await?;
    let dairy = directory.create_activity(NewActivity::root("Dairy")).await?;

    let result = directory
        .create_organization(NewOrganization {
            name: "Twice".into(),
            building_id: site.id,
            phones: vec![],
            activity_ids: vec![dairy.id, dairy.id],
        })
        .await;
    match result {
        Err(Error::BadRequest(message)) => assert_eq!(message, "Some activity_ids not found"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(organization_count(&directory).await?, 0);
    Ok(())
}

#[actix_rt::test]
async fn created_organization_is_hydrated() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;
    let site = building(&directory, 55.75, 37.61).await?;
    let it = directory.create_activity(NewActivity::root("IT")).await?;
    let web = directory.create_activity(NewActivity::child("Web", it.id)).await?;

    let created = directory
        .create_organization(NewOrganization {
            name: "Studio".into(),
            building_id: site.id,
            phones: vec!["2-222-222".into(), "3-333-333".into()],
            activity_ids: vec![web.id, it.id],
        })
        .await?;

    let fetched = directory.organization(created.id).await?;
    assert_eq!(fetched, created);
    assert_eq!(fetched.phones, vec!["2-222-222", "3-333-333"]);
    assert_eq!(fetched.building, site);
    assert_eq!(fetched.activities, vec![it, web]);

    assert!(matches!(
        directory.organization(created.id + 1).await,
        Err(Error::NotFound(_))
    ));
    Ok(())
}

#[actix_rt::test]
async fn name_search_ignores_case() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;
    let site = building(&directory, 55.75, 37.61).await?;
    organization(&directory, "ООО \"Рога и Копыта\"", site.id, vec![]).await?;
    organization(&directory, "Milk Plus", site.id, vec![]).await?;

    for query in vec!["рога", "РОГА И", "Копыта\""] {
        let found = directory.organizations_by_name(Some(query)).await?;
        assert_eq!(names(&found), vec!["ООО \"Рога и Копыта\""], "query {:?}", query);
    }
    let found = directory.organizations_by_name(Some("plus")).await?;
    assert_eq!(names(&found), vec!["Milk Plus"]);
    Ok(())
}

#[actix_rt::test]
async fn name_search_requires_text() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;

    assert!(matches!(
        directory.organizations_by_name(None).await,
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        directory.organizations_by_name(Some("")).await,
        Err(Error::Validation(_))
    ));
    Ok(())
}

#[actix_rt::test]
async fn nearby_by_radius() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;
    let moscow = building(&directory, 55.7558, 37.6173).await?;
    let petersburg = building(&directory, 59.9350, 30.3200).await?;
    organization(&directory, "Moscow office", moscow.id, vec![]).await?;
    organization(&directory, "Petersburg office", petersburg.id, vec![]).await?;

    let exact = NearbyParams {
        lat: Some(moscow.latitude),
        lng: Some(moscow.longitude),
        radius_km: Some(0.0),
        ..Default::default()
    };
    let found = directory.organizations_nearby(exact).await?;
    assert_eq!(names(&found), vec!["Moscow office"]);

    let wide = NearbyParams {
        radius_km: Some(1000.0),
        ..exact
    };
    assert_eq!(directory.organizations_nearby(wide).await?.len(), 2);

    let nowhere = NearbyParams {
        lat: Some(0.0),
        lng: Some(0.0),
        radius_km: Some(1.0),
        ..Default::default()
    };
    assert!(directory.organizations_nearby(nowhere).await?.is_empty());
    Ok(())
}

#[actix_rt::test]
async fn nearby_rectangle_is_inclusive() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;
    let corner = building(&directory, 55.0, 37.0).await?;
    let opposite = building(&directory, 56.0, 38.0).await?;
    let outside = building(&directory, 56.0001, 37.5).await?;
    organization(&directory, "Corner", corner.id, vec![]).await?;
    organization(&directory, "Opposite", opposite.id, vec![]).await?;
    organization(&directory, "Outside", outside.id, vec![]).await?;

    let params = NearbyParams {
        min_lat: Some(55.0),
        max_lat: Some(56.0),
        min_lng: Some(37.0),
        max_lng: Some(38.0),
        ..Default::default()
    };
    let found = directory.organizations_nearby(params).await?;
    assert_eq!(names(&found), vec!["Corner", "Opposite"]);

    let incomplete = NearbyParams {
        max_lng: None,
        ..params
    };
    assert!(matches!(
        directory.organizations_nearby(incomplete).await,
        Err(Error::BadRequest(_))
    ));
    Ok(())
}

#[actix_rt::test]
async fn seeding_is_idempotent() -> anyhow::Result<()> {
    let dir = TempDir::new("directory")?;
    let directory = directory(&dir)?;

    assert!(seed(&directory).await?);
    assert!(!seed(&directory).await?);

    assert_eq!(directory.buildings().await?.len(), 3);
    assert_eq!(directory.activities().await?.len(), 8);
    assert_eq!(organization_count(&directory).await?, 5);

    let cars = directory
        .activities()
        .await?
        .into_iter()
        .find(|a| a.name == "Cars")
        .ok_or_else(|| anyhow::anyhow!("no Cars activity"))?;
    let found = directory.organizations_by_activity(cars.id).await?;
    assert_eq!(
        names(&found),
        vec!["Cargo Transport JSC", "Nord Auto Parts", "Petrov Passenger Cars"]
    );
    Ok(())
}
