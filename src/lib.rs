/*!
noc-routing-lib
=====

This crate provides the routing decision of the routers of a packet-switched on-chip interconnect. Given the virtual network of a packet, its destination router and endpoints, and the direction by which it arrived, it computes the outport the packet takes at the current router.

# Usage

This crate is `noc-routing-lib`. To use it add `noc-routing-lib` to your dependencies in your project's `Cargo.toml`.

```toml
[dependencies]
noc-routing-lib = "0.1"
```

The crate does not simulate the router pipeline, the links or the flow control. It is meant to be called from a simulator, which builds one [RoutingUnit](routing::RoutingUnit) per router, fills it while building the topology and asks it for an outport for each packet at the head of an input buffer.

# Public Interface

* [NetworkParameters](network::NetworkParameters) holds the routing algorithm and the ordered virtual networks. It is built once and shared by every router through an `Arc`.
* [RoutingUnit](routing::RoutingUnit) is the routing state of a router. The topology builder calls `add_route`, `add_weight`, `add_in_direction` and `add_out_direction`. Afterwards the simulator calls `outport_compute`.
* [LoadQuery](routing::LoadQuery) is implemented by the simulator to tell the number of requests waiting at each outport. A `Vec<usize>` indexed by port is enough.
* [Plugs] allows to register user algorithms, which are selected by `Custom { name: ... }`.

The random decisions draw from a `&RefCell<StdRng>` given by the caller, so that each thread owns its generator and runs are reproducible from a seed.

```
use std::cell::RefCell;
use std::sync::Arc;
use rand::{SeedableRng,rngs::StdRng};
use noc_routing_lib::{Plugs,DestinationSet,PortDirection};
use noc_routing_lib::network::{NetworkParameters,RoutingAlgorithm};
use noc_routing_lib::routing::{RoutingUnit,RouteInfo};

let network=Arc::new(NetworkParameters::new(8,RoutingAlgorithm::Ring));
let mut unit=RoutingUnit::new(0,network,&Plugs::default()).unwrap();
unit.add_out_direction(PortDirection::Clockwise,0);
unit.add_out_direction(PortDirection::CounterClockwise,1);
let rng=RefCell::new(StdRng::seed_from_u64(1));
let route=RouteInfo::new(0,6,DestinationSet::from_endpoints(vec![6]));
let port=unit.outport_compute(&route,2,&PortDirection::Local,&Vec::<usize>::new(),&rng).unwrap();
assert_eq!(port,1);
```

# Configuration Syntax

The network parameters can be built from a `ConfigurationValue`, the same tree used by the simulators of this family.

```ignore
Network
{
	routers: 64,
	routing: Torus3D { sides: [4,4,4] },
	ordered_virtual_networks: [false, true, false],
}
```

## Routing algorithms

* `Table`. Use the routing table built with the topology. Among the links reaching the destination, those of minimum weight are the candidates. In ordered virtual networks the first candidate is taken; otherwise one is drawn at random.
* `MeshXY { rows: 4, columns: 4 }`. Dimension order in a mesh. One of `rows` and `columns` may be omitted.
* `Ring`. The shortest way around a ring. Ties go clockwise.
* `Torus3D { sides: [kx,ky,kz] }`. Dimension order X, Y, Z in a torus, taking the wrap-around links when they are shorter. Without `sides` the torus is a cube.
* `Torus3DAdaptive { sides: [kx,ky,kz] }`. A random productive direction among X and Y, then Z.
* `Butterfly`. Corrects at each hop the highest bit in which the current and destination routers differ, by the ports `Up_s<stage>` and `Down_s<stage>`.
* `ButterflyRailway`. As `Butterfly`, but takes the railway `Left`/`Right` ports when the butterfly port has more requests waiting.
* `Custom { name: "..." }`. The algorithm plugged with that name.

Packets at their destination router always use the routing table.

# Logging

The crate logs through the `log` facade. Every decision is logged at `trace` level and the adaptive choices at `debug` level. No logger is installed here.
*/

pub use quantifiable_derive::Quantifiable;//the derive macro

pub mod error;
pub mod quantify;
pub mod config;
pub mod network;
pub mod port;
pub mod destination;
pub mod table;
pub mod topology;
pub mod routing;

use std::collections::BTreeMap;
use std::fmt::Debug;

pub use config::ConfigurationValue;
pub use destination::DestinationSet;
pub use error::{Error,ErrorKind};
pub use network::{NetworkParameters,RoutingAlgorithm};
pub use port::{PortDirection,PortRegistry};
pub use routing::{RoutingUnit,RouteInfo,LoadQuery,CustomRouting,CustomRoutingBuilderArgument};
pub use table::RoutingTable;

///The user defined builders of routing algorithms, by name.
#[derive(Default)]
pub struct Plugs
{
	custom_routings: BTreeMap<String, fn(CustomRoutingBuilderArgument) -> Box<dyn CustomRouting> >,
}

impl Plugs
{
	pub fn add_custom_routing(&mut self, key:String, builder:fn(CustomRoutingBuilderArgument) -> Box<dyn CustomRouting>)
	{
		self.custom_routings.insert(key,builder);
	}
	///Build the custom routing registered with `arg.name`, if any.
	pub fn custom_routing(&self, arg:CustomRoutingBuilderArgument) -> Option<Box<dyn CustomRouting>>
	{
		self.custom_routings.get(arg.name).map(|builder|builder(arg))
	}
}

impl Debug for Plugs
{
	fn fmt(&self,f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error>
	{
		write!(f,"{};",self.custom_routings.keys().map(|s|s.to_string()).collect::<Vec<String>>().join(","))?;
		Ok(())
	}
}
