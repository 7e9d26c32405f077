//! Demo data loaded into an empty catalog.

use orgdir_model::{NewActivity, NewBuilding, NewOrganization};

use crate::dao::BuildingDao;
use crate::directory::Directory;
use crate::error::Error;

/// Fills an empty catalog with demo buildings, activities and organizations.
///
/// Does nothing when any building exists already. Returns whether data was
/// inserted.
pub async fn seed(directory: &Directory) -> Result<bool, Error> {
    if !directory.db().as_dao::<BuildingDao>().is_empty().await? {
        log::info!("Catalog is not empty, skipping demo data");
        return Ok(false);
    }

    let building = |address: &str, latitude: f64, longitude: f64| NewBuilding {
        address: address.into(),
        latitude,
        longitude,
    };
    let lenina = directory
        .create_building(building("Moscow, Lenina st. 1, office 3", 55.7558, 37.6173))
        .await?;
    let blyukhera = directory
        .create_building(building("Moscow, Blyukhera st. 32/1", 55.7900, 37.5600))
        .await?;
    let nevsky = directory
        .create_building(building("Saint Petersburg, Nevsky ave. 10", 59.9350, 30.3200))
        .await?;

    let food = directory.create_activity(NewActivity::root("Food")).await?;
    let cars = directory.create_activity(NewActivity::root("Cars")).await?;
    let meat = directory
        .create_activity(NewActivity::child("Meat products", food.id))
        .await?;
    let dairy = directory
        .create_activity(NewActivity::child("Dairy products", food.id))
        .await?;
    let trucks = directory
        .create_activity(NewActivity::child("Trucks", cars.id))
        .await?;
    let passenger = directory
        .create_activity(NewActivity::child("Passenger cars", cars.id))
        .await?;
    let parts = directory
        .create_activity(NewActivity::child("Spare parts", passenger.id))
        .await?;
    let accessories = directory
        .create_activity(NewActivity::child("Accessories", passenger.id))
        .await?;

    let organizations = vec![
        (
            "Horns and Hooves LLC",
            lenina.id,
            vec!["2-222-222", "3-333-333"],
            vec![meat.id, dairy.id],
        ),
        ("Milk Plus JSC", lenina.id, vec!["8-923-666-13-13"], vec![dairy.id]),
        ("Cargo Transport JSC", blyukhera.id, vec!["8-800-123-45-67"], vec![trucks.id]),
        (
            "Nord Auto Parts",
            nevsky.id,
            vec!["812-111-22-33", "812-444-55-66"],
            vec![parts.id, accessories.id],
        ),
        ("Petrov Passenger Cars", blyukhera.id, vec!["499-000-11-22"], vec![passenger.id]),
    ];
    for (name, building_id, phones, activity_ids) in organizations {
        directory
            .create_organization(NewOrganization {
                name: name.into(),
                building_id,
                phones: phones.into_iter().map(String::from).collect(),
                activity_ids,
            })
            .await?;
    }

    log::info!("Demo data loaded");
    Ok(true)
}
