
use crate::error::Error;
use super::check_router;

///Hops from `origin` to `destination` going clockwise, that is, by increasing index.
pub fn clockwise_distance(origin:usize, destination:usize, num_routers:usize) -> Result<usize,Error>
{
	check_router(origin,num_routers)?;
	check_router(destination,num_routers)?;
	Ok((destination+num_routers-origin)%num_routers)
}

///Hops from `origin` to `destination` going counterclockwise, that is, by decreasing index.
pub fn counter_clockwise_distance(origin:usize, destination:usize, num_routers:usize) -> Result<usize,Error>
{
	check_router(origin,num_routers)?;
	check_router(destination,num_routers)?;
	Ok((origin+num_routers-destination)%num_routers)
}
