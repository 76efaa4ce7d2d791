mod atmospheric_flight;
mod mesh;
