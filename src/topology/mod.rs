/*!
Coordinate arithmetic of the topologies supported by the direction-based routing algorithms.

Routers are identified by an index in `0..num_routers`. Each topology family maps that index into its own address space: coordinates in a mesh or torus, a position in a ring or the bits of the index in a butterfly. All the functions here are pure; an index outside the network is a `DestinationUnreachable` error.
*/

pub mod cartesian;
pub mod ring;
pub mod butterfly;

use crate::error::Error;
use crate::source_location;

pub use self::cartesian::{CartesianData,MeshShape,TorusShape,Sign,torus_delta};
pub use self::ring::{clockwise_distance,counter_clockwise_distance};
pub use self::butterfly::{butterfly_stages,butterfly_hop};

///Check that `router` is an index of a network with `num_routers` routers.
pub fn check_router(router:usize, num_routers:usize) -> Result<(),Error>
{
	if router>=num_routers
	{
		return Err(Error::destination_unreachable(source_location!(),router,num_routers));
	}
	Ok(())
}
