mod earth_moon;
