mod frames;
mod tle;
