pub mod vehicle_routes;

pub use vehicle_routes::create_vehicle_router;
