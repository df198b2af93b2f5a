/*!
The routing unit of a router: the decision of which outport a packet takes next.

A [RoutingUnit] owns the port registry and the routing table of its router and shares the [NetworkParameters] with every other router. The decision is the pure function [RoutingUnit::outport_compute]. Packets that reached their destination router always use the routing table, which knows the port of each endpoint. Other packets use the algorithm selected in the network parameters.

Every algorithm here chooses among minimal directions; none of the adaptive ones guarantees deadlock freedom by itself, that must be provided by the virtual network or virtual channel assignment.
*/

use std::cell::RefCell;
use std::fmt::Debug;
use std::mem::size_of;
use std::sync::Arc;

use ::rand::{Rng,rngs::StdRng};

use crate::destination::DestinationSet;
use crate::error::Error;
use crate::network::{NetworkParameters,RoutingAlgorithm};
use crate::port::{PortDirection,PortRegistry};
use crate::quantify::{Quantifiable,human_bytes};
use crate::table::RoutingTable;
use crate::topology::{MeshShape,TorusShape,Sign,check_router,clockwise_distance,counter_clockwise_distance,butterfly_hop};
use crate::{Plugs,source_location};

///What the routing unit knows about a packet.
#[derive(Debug,Clone,PartialEq)]
pub struct RouteInfo
{
	///The virtual network of the packet.
	pub vnet: usize,
	///The router to which the destination endpoints are attached.
	pub dest_router: usize,
	///The destination endpoints, as used by the routing table.
	pub net_dest: DestinationSet,
}

impl RouteInfo
{
	pub fn new(vnet:usize, dest_router:usize, net_dest:DestinationSet) -> RouteInfo
	{
		RouteInfo{
			vnet,
			dest_router,
			net_dest,
		}
	}
}

///Access to the congestion state of the router, by outport.
///Reading the load of two ports is not atomic; adaptive decisions may use slightly stale values.
pub trait LoadQuery
{
	///The number of requests currently waiting to use the outport `port`.
	fn outstanding_requests(&self, port:usize) -> usize;
}

impl LoadQuery for [usize]
{
	fn outstanding_requests(&self, port:usize) -> usize
	{
		self.get(port).copied().unwrap_or(0)
	}
}

impl LoadQuery for Vec<usize>
{
	fn outstanding_requests(&self, port:usize) -> usize
	{
		self.as_slice().outstanding_requests(port)
	}
}

///A routing algorithm provided by the user. It is built by a function registered in the `Plugs` and used by the routers configured with `Custom { name }`.
pub trait CustomRouting : Debug + Send + Sync
{
	///Compute the outport of a packet not yet at its destination router.
	///The `unit` gives access to the registry, the table and the network parameters of the router.
	fn outport_compute(&self, unit:&RoutingUnit, route:&RouteInfo, inport:usize, inport_direction:&PortDirection, load:&dyn LoadQuery, rng:&RefCell<StdRng>) -> Result<usize,Error>;
}

///The argument of a builder function for `CustomRouting`s.
#[non_exhaustive]
#[derive(Debug)]
pub struct CustomRoutingBuilderArgument<'a>
{
	///The name under which the builder was registered.
	pub name: &'a str,
	///The router that will use the routing.
	pub router_id: usize,
	///The parameters of the whole network.
	pub network: &'a NetworkParameters,
	///The user defined plugs. In case the routing needs to create elements.
	pub plugs: &'a Plugs,
}

///The routing state of a router.
#[derive(Debug)]
pub struct RoutingUnit
{
	router_id: usize,
	network: Arc<NetworkParameters>,
	ports: PortRegistry,
	table: RoutingTable,
	///The plugged algorithm when the network uses `Custom`.
	custom: Option<Box<dyn CustomRouting>>,
}

impl RoutingUnit
{
	///Create the routing unit of router `router_id`, with empty registry and table.
	///When the network uses a custom algorithm it is built here from the `plugs`. An unknown name is not an error until a packet needs it.
	pub fn new(router_id:usize, network:Arc<NetworkParameters>, plugs:&Plugs) -> Result<RoutingUnit,Error>
	{
		network.validate()?;
		check_router(router_id,network.num_routers)?;
		let custom=match network.routing_algorithm
		{
			RoutingAlgorithm::Custom(ref name) =>
			{
				let custom=plugs.custom_routing(CustomRoutingBuilderArgument{
					name,
					router_id,
					network: &network,
					plugs,
				});
				if custom.is_none()
				{
					log::debug!("router {}: no custom routing plugged with name {:?}",router_id,name);
				}
				custom
			},
			_ => None,
		};
		Ok(RoutingUnit{
			router_id,
			network,
			ports: PortRegistry::new(),
			table: RoutingTable::new(),
			custom,
		})
	}
	pub fn router_id(&self) -> usize
	{
		self.router_id
	}
	pub fn network(&self) -> &NetworkParameters
	{
		&self.network
	}
	pub fn ports(&self) -> &PortRegistry
	{
		&self.ports
	}
	pub fn table(&self) -> &RoutingTable
	{
		&self.table
	}
	///Append a link to the routing table, with its destinations in each virtual network.
	pub fn add_route(&mut self, entry:Vec<DestinationSet>)
	{
		self.table.add_route(entry);
	}
	///Append the weight of the last link added.
	pub fn add_weight(&mut self, weight:i32)
	{
		self.table.add_weight(weight);
	}
	pub fn add_in_direction(&mut self, direction:PortDirection, index:usize)
	{
		self.ports.add_in_direction(direction,index);
	}
	pub fn add_out_direction(&mut self, direction:PortDirection, index:usize)
	{
		self.ports.add_out_direction(direction,index);
	}
	///Check that the table was built consistently. To be called once the topology has been built.
	pub fn validate(&self) -> Result<(),Error>
	{
		self.table.validate().map_err(|e|e.with_message(format!("router {}",self.router_id)))
	}
	///The outport of the routing table for the destinations in `net_dest`. See [RoutingTable::lookup].
	pub fn lookup_routing_table(&self, vnet:usize, net_dest:&DestinationSet, rng:&RefCell<StdRng>) -> Result<usize,Error>
	{
		self.table.lookup(vnet,net_dest,self.network.is_vnet_ordered(vnet),rng)
	}
	///The outport that the packet described by `route`, which entered by `inport` from `inport_direction`, must take.
	///`load` is only read by the load-aware algorithms and `rng` only by the random ones.
	pub fn outport_compute(&self, route:&RouteInfo, inport:usize, inport_direction:&PortDirection, load:&dyn LoadQuery, rng:&RefCell<StdRng>) -> Result<usize,Error>
	{
		let algorithm=&self.network.routing_algorithm;
		let context=|e:Error|e.with_message(format!("router {} with routing {} for a packet in vnet {} to router {} entering by {}",
			self.router_id,algorithm,route.vnet,route.dest_router,inport_direction));
		check_router(route.dest_router,self.network.num_routers).map_err(context)?;
		if route.dest_router==self.router_id
		{
			let outport=self.lookup_routing_table(route.vnet,&route.net_dest,rng).map_err(context)?;
			log::trace!("router {}: packet in vnet {} delivered through port {}",self.router_id,route.vnet,outport);
			return Ok(outport);
		}
		let outport=match algorithm
		{
			RoutingAlgorithm::Table => self.lookup_routing_table(route.vnet,&route.net_dest,rng),
			RoutingAlgorithm::MeshXY(mesh) => self.outport_compute_xy(mesh,route,inport_direction),
			RoutingAlgorithm::Ring => self.outport_compute_ring(route,inport_direction),
			RoutingAlgorithm::Torus3D(torus) => self.outport_compute_torus_3d(torus,route),
			RoutingAlgorithm::Torus3DAdaptive(torus) => self.outport_compute_torus_3d_adaptive(torus,route,rng),
			RoutingAlgorithm::Butterfly => self.outport_compute_butterfly(route),
			RoutingAlgorithm::ButterflyRailway => self.outport_compute_butterfly_railway(route,load),
			RoutingAlgorithm::Custom(name) => match self.custom
			{
				Some(ref custom) => custom.outport_compute(self,route,inport,inport_direction,load,rng),
				None => Err(Error::not_implemented(source_location!(),format!("Custom({})",name))),
			},
		}.map_err(context)?;
		log::trace!("router {}: {} sends the packet to router {} through port {}",self.router_id,algorithm,route.dest_router,outport);
		Ok(outport)
	}
	///Dimension order routing in a mesh, first along X then along Y.
	fn outport_compute_xy(&self, mesh:&MeshShape, route:&RouteInfo, inport_direction:&PortDirection) -> Result<usize,Error>
	{
		let (my_x,my_y)=mesh.coordinates(self.router_id)?;
		let (dest_x,dest_y)=mesh.coordinates(route.dest_router)?;
		let direction=if my_x!=dest_x
		{
			if dest_x>my_x
			{
				//Already turned to Y or going West is forbidden.
				if *inport_direction!=PortDirection::Local && *inport_direction!=PortDirection::West
				{
					return Err(Error::routing_invariant_violation(source_location!(),inport_direction.clone(),Some(PortDirection::East)));
				}
				PortDirection::East
			}
			else
			{
				if *inport_direction!=PortDirection::Local && *inport_direction!=PortDirection::East
				{
					return Err(Error::routing_invariant_violation(source_location!(),inport_direction.clone(),Some(PortDirection::West)));
				}
				PortDirection::West
			}
		}
		else if my_y!=dest_y
		{
			//Any inport except one that would mean a Y reversal.
			if dest_y>my_y
			{
				if *inport_direction==PortDirection::North
				{
					return Err(Error::routing_invariant_violation(source_location!(),inport_direction.clone(),Some(PortDirection::North)));
				}
				PortDirection::North
			}
			else
			{
				if *inport_direction==PortDirection::South
				{
					return Err(Error::routing_invariant_violation(source_location!(),inport_direction.clone(),Some(PortDirection::South)));
				}
				PortDirection::South
			}
		}
		else
		{
			return Err(Error::routing_invariant_violation(source_location!(),inport_direction.clone(),None));
		};
		self.ports.outport(&direction)
	}
	///Shortest way around the ring. Ties go clockwise.
	fn outport_compute_ring(&self, route:&RouteInfo, inport_direction:&PortDirection) -> Result<usize,Error>
	{
		let num_routers=self.network.num_routers;
		let clockwise=clockwise_distance(self.router_id,route.dest_router,num_routers)?;
		let counter_clockwise=counter_clockwise_distance(self.router_id,route.dest_router,num_routers)?;
		//A packet never reverses its sense.
		let (direction,allowed_inport)=if clockwise<=counter_clockwise
		{
			(PortDirection::Clockwise,PortDirection::CounterClockwise)
		}
		else
		{
			(PortDirection::CounterClockwise,PortDirection::Clockwise)
		};
		if *inport_direction!=PortDirection::Local && *inport_direction!=allowed_inport
		{
			return Err(Error::routing_invariant_violation(source_location!(),inport_direction.clone(),Some(direction)));
		}
		self.ports.outport(&direction)
	}
	///Dimension order X, Y, Z, each dimension along its shortest way.
	fn outport_compute_torus_3d(&self, torus:&TorusShape, route:&RouteInfo) -> Result<usize,Error>
	{
		let deltas=torus.deltas(self.router_id,route.dest_router)?;
		let direction=deltas.iter().enumerate()
			.find(|&(_,&(hops,_))|hops>0)
			.map(|(dimension,&(_,sign))|torus_direction(dimension,sign))
			.ok_or_else(||Error::routing_invariant_violation(source_location!(),PortDirection::Local,None))?;
		self.ports.outport(&direction)
	}
	///A random productive direction in X or Y. The Z dimension is only travelled once X and Y are done.
	///On an even side a destination at half the ring is reached going forward; both ways are minimal.
	fn outport_compute_torus_3d_adaptive(&self, torus:&TorusShape, route:&RouteInfo, rng:&RefCell<StdRng>) -> Result<usize,Error>
	{
		let deltas=torus.deltas(self.router_id,route.dest_router)?;
		let mut candidates:Vec<PortDirection>=deltas[..2].iter().enumerate()
			.filter(|&(_,&(hops,_))|hops>0)
			.map(|(dimension,&(_,sign))|torus_direction(dimension,sign))
			.collect();
		if candidates.is_empty()
		{
			let (hops,sign)=deltas[2];
			if hops==0
			{
				return self.ports.outport(&PortDirection::Local);
			}
			candidates.push(torus_direction(2,sign));
		}
		let direction=if candidates.len()==1
		{
			candidates.swap_remove(0)
		}
		else
		{
			let r=rng.borrow_mut().gen_range(0..candidates.len());
			log::debug!("router {}: adaptive choice {} among {:?}",self.router_id,candidates[r],candidates);
			candidates.swap_remove(r)
		};
		self.ports.outport(&direction)
	}
	///The direction in the butterfly that corrects the highest differing bit. `Local` when there is no bit to correct.
	fn butterfly_direction(&self, route:&RouteInfo) -> Result<PortDirection,Error>
	{
		Ok(match butterfly_hop(self.router_id,route.dest_router,self.network.num_routers)?
		{
			Some((stage,true)) => PortDirection::Up(stage),
			Some((stage,false)) => PortDirection::Down(stage),
			None => PortDirection::Local,
		})
	}
	fn outport_compute_butterfly(&self, route:&RouteInfo) -> Result<usize,Error>
	{
		let direction=self.butterfly_direction(route)?;
		self.ports.outport(&direction)
	}
	///Either the butterfly or the railway, whichever has no more outstanding requests. Ties go to the butterfly.
	fn outport_compute_butterfly_railway(&self, route:&RouteInfo, load:&dyn LoadQuery) -> Result<usize,Error>
	{
		let butterfly_port=self.ports.outport(&self.butterfly_direction(route)?)?;
		let railway_direction=if self.router_id<route.dest_router { PortDirection::Right } else { PortDirection::Left };
		let railway_port=self.ports.outport(&railway_direction)?;
		let butterfly_load=load.outstanding_requests(butterfly_port);
		let railway_load=load.outstanding_requests(railway_port);
		let h=butterfly_load as i64 - railway_load as i64;
		log::debug!("router {}: butterfly port {} has {} requests, railway port {} has {} requests",self.router_id,butterfly_port,butterfly_load,railway_port,railway_load);
		if h<=0
		{
			Ok(butterfly_port)
		}
		else
		{
			Ok(railway_port)
		}
	}
}

///The direction along `dimension` (0 for X, 1 for Y, 2 for Z) with the given sign.
fn torus_direction(dimension:usize, sign:Sign) -> PortDirection
{
	match (dimension,sign)
	{
		(0,Sign::Positive) => PortDirection::PosX,
		(0,Sign::Negative) => PortDirection::NegX,
		(1,Sign::Positive) => PortDirection::PosY,
		(1,Sign::Negative) => PortDirection::NegY,
		(_,Sign::Positive) => PortDirection::PosZ,
		(_,Sign::Negative) => PortDirection::NegZ,
	}
}

impl Quantifiable for RoutingUnit
{
	fn total_memory(&self) -> usize
	{
		size_of::<RoutingUnit>() + self.ports.total_memory() + self.table.total_memory()
	}
	fn print_memory_breakdown(&self)
	{
		println!("RoutingUnit of router {}: {}",self.router_id,human_bytes(self.total_memory()));
		println!("  ports: {}",human_bytes(self.ports.total_memory()));
		println!("  table: {}",human_bytes(self.table.total_memory()));
	}
	fn forecast_total_memory(&self) -> usize
	{
		self.total_memory()
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::error::ErrorKind;
	use ::rand::SeedableRng;

	fn rng() -> RefCell<StdRng>
	{
		RefCell::new(StdRng::seed_from_u64(10u64))
	}

	fn no_load() -> Vec<usize>
	{
		vec![]
	}

	///A unit whose outports are numbered in the order of `directions`, with a Local port at the end.
	fn unit(router_id:usize, algorithm:RoutingAlgorithm, num_routers:usize, directions:&[PortDirection]) -> RoutingUnit
	{
		let network=Arc::new(NetworkParameters::new(num_routers,algorithm));
		let mut unit=RoutingUnit::new(router_id,network,&Plugs::default()).unwrap();
		for (index,direction) in directions.iter().chain(std::iter::once(&PortDirection::Local)).enumerate()
		{
			unit.add_out_direction(direction.clone(),index);
			unit.add_in_direction(direction.clone(),index);
		}
		unit
	}

	fn route(dest_router:usize) -> RouteInfo
	{
		RouteInfo::new(0,dest_router,DestinationSet::from_endpoints(vec![dest_router]))
	}

	fn mesh_unit(router_id:usize) -> RoutingUnit
	{
		use PortDirection::*;
		unit(router_id,RoutingAlgorithm::MeshXY(MeshShape::new(4,4).unwrap()),16,&[North,South,East,West])
	}

	#[test]
	fn mesh_goes_x_first()
	{
		let unit=mesh_unit(5);
		//(1,1) to (2,3).
		let port=unit.outport_compute(&route(14),0,&PortDirection::Local,&no_load(),&rng()).unwrap();
		assert_eq!(unit.ports().outport_direction(port).unwrap(),&PortDirection::East);
		//(1,1) to (1,3).
		let port=unit.outport_compute(&route(13),0,&PortDirection::South,&no_load(),&rng()).unwrap();
		assert_eq!(unit.ports().outport_direction(port).unwrap(),&PortDirection::North);
		//(1,1) to (0,0).
		let port=unit.outport_compute(&route(0),0,&PortDirection::East,&no_load(),&rng()).unwrap();
		assert_eq!(unit.ports().outport_direction(port).unwrap(),&PortDirection::West);
	}

	#[test]
	fn mesh_rejects_turns_back_to_x()
	{
		let unit=mesh_unit(5);
		let error=unit.outport_compute(&route(14),0,&PortDirection::South,&no_load(),&rng()).unwrap_err();
		assert_eq!(error.kind,ErrorKind::RoutingInvariantViolation{inport_direction:PortDirection::South,outport_direction:Some(PortDirection::East)});
		let message=error.message.unwrap();
		assert!(message.contains("router 5"),"{}",message);
		assert!(message.contains("MeshXY"),"{}",message);
		//Reversing in Y.
		let error=unit.outport_compute(&route(13),0,&PortDirection::North,&no_load(),&rng()).unwrap_err();
		assert_eq!(error.kind,ErrorKind::RoutingInvariantViolation{inport_direction:PortDirection::North,outport_direction:Some(PortDirection::North)});
	}

	#[test]
	fn ring_takes_the_short_way()
	{
		use PortDirection::*;
		let unit=unit(0,RoutingAlgorithm::Ring,8,&[Clockwise,CounterClockwise]);
		//Tie at distance 4 goes clockwise.
		assert_eq!(unit.outport_compute(&route(4),0,&Local,&no_load(),&rng()).unwrap(),0);
		assert_eq!(unit.outport_compute(&route(3),0,&CounterClockwise,&no_load(),&rng()).unwrap(),0);
		assert_eq!(unit.outport_compute(&route(6),0,&Local,&no_load(),&rng()).unwrap(),1);
		let error=unit.outport_compute(&route(6),0,&CounterClockwise,&no_load(),&rng()).unwrap_err();
		assert_eq!(error.kind,ErrorKind::RoutingInvariantViolation{inport_direction:CounterClockwise,outport_direction:Some(CounterClockwise)});
	}

	#[test]
	fn torus_uses_the_wraparound_link()
	{
		use PortDirection::*;
		let torus=TorusShape::new([4,4,4]).unwrap();
		let unit=unit(3,RoutingAlgorithm::Torus3D(torus),64,&[PosX,NegX,PosY,NegY,PosZ,NegZ]);
		//(3,0,0) to (0,0,0) is one hop forward.
		assert_eq!(unit.outport_compute(&route(0),0,&Local,&no_load(),&rng()).unwrap(),0);
		//(3,0,0) to (3,3,2): Y backward first, then Z.
		let dest=3+4*3+16*2;
		assert_eq!(unit.outport_compute(&route(dest),0,&PosY,&no_load(),&rng()).unwrap(),3);
		//(3,0,0) to (3,0,1).
		assert_eq!(unit.outport_compute(&route(3+16),0,&NegX,&no_load(),&rng()).unwrap(),4);
	}

	#[test]
	fn adaptive_torus_chooses_among_x_and_y()
	{
		use PortDirection::*;
		let torus=TorusShape::new([4,4,4]).unwrap();
		let unit=unit(0,RoutingAlgorithm::Torus3DAdaptive(torus),64,&[PosX,NegX,PosY,NegY,PosZ,NegZ]);
		let rng=rng();
		//(0,0,0) to (1,1,1): PosX or PosY, never Z yet.
		let dest=1+4+16;
		let mut seen=[false;7];
		for _ in 0..100
		{
			let port=unit.outport_compute(&route(dest),0,&Local,&no_load(),&rng).unwrap();
			seen[port]=true;
		}
		assert_eq!(seen,[true,false,true,false,false,false,false]);
		//(0,0,0) to (0,0,3): only Z remains, one hop backward.
		assert_eq!(unit.outport_compute(&route(48),0,&Local,&no_load(),&rng).unwrap(),5);
		//(0,0,0) to (2,0,0): half the ring, always forward.
		for _ in 0..20
		{
			assert_eq!(unit.outport_compute(&route(2),0,&Local,&no_load(),&rng).unwrap(),0);
		}
	}

	#[test]
	fn adaptive_torus_is_reproducible()
	{
		use PortDirection::*;
		let torus=TorusShape::new([4,4,4]).unwrap();
		let unit=unit(0,RoutingAlgorithm::Torus3DAdaptive(torus),64,&[PosX,NegX,PosY,NegY,PosZ,NegZ]);
		let draws=|seed:u64|{
			let rng=RefCell::new(StdRng::seed_from_u64(seed));
			(0..20).map(|_|unit.outport_compute(&route(1+4),0,&Local,&no_load(),&rng).unwrap()).collect::<Vec<usize>>()
		};
		assert_eq!(draws(7),draws(7));
	}

	#[test]
	fn butterfly_corrects_the_highest_bit()
	{
		use PortDirection::*;
		let unit=unit(2,RoutingAlgorithm::Butterfly,8,&[Up(0),Down(0),Up(1),Down(1),Up(2),Down(2)]);
		assert_eq!(unit.outport_compute(&route(5),0,&Local,&no_load(),&rng()).unwrap(),4);
		//2=010 to 0=000 corrects bit 1 down.
		assert_eq!(unit.outport_compute(&route(0),0,&Local,&no_load(),&rng()).unwrap(),3);
	}

	#[test]
	fn railway_is_taken_only_when_less_loaded()
	{
		use PortDirection::*;
		let with_lower_stage=unit(2,RoutingAlgorithm::ButterflyRailway,8,&[Up(2),Down(2),Left,Right,Down(1)]);
		let unit=unit(2,RoutingAlgorithm::ButterflyRailway,8,&[Up(2),Down(2),Left,Right]);
		//Equal load goes to the butterfly.
		assert_eq!(unit.outport_compute(&route(5),0,&Local,&vec![3usize,0,0,3],&rng()).unwrap(),0);
		assert_eq!(unit.outport_compute(&route(5),0,&Local,&vec![4usize,0,0,3],&rng()).unwrap(),3);
		//Without the butterfly port of the stage it cannot be chosen.
		assert_eq!(unit.outport_compute(&route(0),0,&Local,&vec![0usize,0,0,0],&rng()).unwrap_err().kind,
			ErrorKind::UnknownDirection{direction:Down(1)});
		//Towards a lower index the railway is Left.
		assert_eq!(with_lower_stage.outport_compute(&route(0),0,&Local,&vec![0usize,0,0,0,0],&rng()).unwrap(),4);
		assert_eq!(with_lower_stage.outport_compute(&route(0),0,&Local,&vec![0usize,0,1,0,2],&rng()).unwrap(),2);
		assert_eq!(with_lower_stage.outport_compute(&route(0),0,&Local,&vec![0usize,0,2,0,2],&rng()).unwrap(),4);
	}

	#[test]
	fn destination_router_uses_the_table()
	{
		use PortDirection::*;
		let mut unit=unit(0,RoutingAlgorithm::Ring,4,&[Clockwise,CounterClockwise]);
		let here=DestinationSet::from_endpoints(vec![0]);
		let elsewhere=DestinationSet::from_endpoints(vec![1,2,3]);
		unit.add_route(vec![elsewhere.clone()]);
		unit.add_weight(1);
		unit.add_route(vec![elsewhere]);
		unit.add_weight(1);
		unit.add_route(vec![here]);
		unit.add_weight(1);
		unit.validate().unwrap();
		assert_eq!(unit.outport_compute(&route(0),1,&Clockwise,&no_load(),&rng()).unwrap(),2);
	}

	#[test]
	fn unknown_destination_and_missing_ports()
	{
		use PortDirection::*;
		let unit=unit(0,RoutingAlgorithm::Ring,8,&[Clockwise]);
		let error=unit.outport_compute(&route(8),0,&Local,&no_load(),&rng()).unwrap_err();
		assert_eq!(error.kind,ErrorKind::DestinationUnreachable{node:8,num_routers:8});
		let error=unit.outport_compute(&route(7),0,&Local,&no_load(),&rng()).unwrap_err();
		assert_eq!(error.kind,ErrorKind::UnknownDirection{direction:CounterClockwise});
	}

	#[test]
	fn shape_must_match_the_number_of_routers()
	{
		let network=Arc::new(NetworkParameters::new(20,RoutingAlgorithm::MeshXY(MeshShape::new(4,4).unwrap())));
		let error=RoutingUnit::new(17,network,&Plugs::default()).unwrap_err();
		assert_eq!(error.kind,ErrorKind::IllFormedConfiguration);
		let network=Arc::new(NetworkParameters::new(16,RoutingAlgorithm::MeshXY(MeshShape::new(4,4).unwrap())));
		assert!(RoutingUnit::new(15,network.clone(),&Plugs::default()).is_ok());
		assert_eq!(RoutingUnit::new(16,network,&Plugs::default()).unwrap_err().kind,ErrorKind::DestinationUnreachable{node:16,num_routers:16});
	}

	#[test]
	fn custom_without_plug_is_not_implemented()
	{
		let unit=unit(0,RoutingAlgorithm::Custom("westfirst".to_string()),4,&[]);
		let error=unit.outport_compute(&route(1),0,&PortDirection::Local,&no_load(),&rng()).unwrap_err();
		assert_eq!(error.kind,ErrorKind::NotImplemented{algorithm:"Custom(westfirst)".to_string()});
	}

	///Always leaves by the port with the fewest requests.
	#[derive(Debug)]
	struct LeastLoaded;

	impl CustomRouting for LeastLoaded
	{
		fn outport_compute(&self, unit:&RoutingUnit, _route:&RouteInfo, _inport:usize, _inport_direction:&PortDirection, load:&dyn LoadQuery, _rng:&RefCell<StdRng>) -> Result<usize,Error>
		{
			unit.ports().outports()
				.filter(|(_,direction)|**direction!=PortDirection::Local)
				.min_by_key(|&(port,_)|load.outstanding_requests(port))
				.map(|(port,_)|port)
				.ok_or_else(||Error::no_route_exists(source_location!(),0))
		}
	}

	fn new_least_loaded(_arg:CustomRoutingBuilderArgument) -> Box<dyn CustomRouting>
	{
		Box::new(LeastLoaded)
	}

	#[test]
	fn custom_plug_is_used()
	{
		use PortDirection::*;
		let mut plugs=Plugs::default();
		plugs.add_custom_routing("least_loaded".to_string(),new_least_loaded);
		let network=Arc::new(NetworkParameters::new(4,RoutingAlgorithm::Custom("least_loaded".to_string())));
		let mut unit=RoutingUnit::new(1,network,&plugs).unwrap();
		unit.add_out_direction(Clockwise,0);
		unit.add_out_direction(CounterClockwise,1);
		unit.add_out_direction(Local,2);
		assert_eq!(unit.outport_compute(&route(3),2,&Local,&vec![5usize,2,0],&rng()).unwrap(),1);
		assert_eq!(unit.outport_compute(&route(3),2,&Local,&vec![1usize,2,0],&rng()).unwrap(),0);
	}

	#[test]
	fn units_are_shared_among_threads()
	{
		use PortDirection::*;
		let torus=TorusShape::new([4,4,4]).unwrap();
		let unit=unit(0,RoutingAlgorithm::Torus3DAdaptive(torus),64,&[PosX,NegX,PosY,NegY,PosZ,NegZ]);
		let results:Vec<Vec<usize>>=std::thread::scope(|scope|{
			let handles:Vec<_>=(0..4u64).map(|_|{
				let unit=&unit;
				scope.spawn(move||{
					let rng=RefCell::new(StdRng::seed_from_u64(3));
					(0..16).map(|_|unit.outport_compute(&route(1+4),0,&Local,&no_load(),&rng).unwrap()).collect::<Vec<usize>>()
				})
			}).collect();
			handles.into_iter().map(|h|h.join().unwrap()).collect()
		});
		for result in results.iter()
		{
			assert_eq!(result,&results[0]);
		}
	}

	#[test]
	fn memory_includes_the_table()
	{
		let mut unit=mesh_unit(0);
		let before=unit.total_memory();
		unit.add_route(vec![DestinationSet::from_endpoints(0..200)]);
		unit.add_weight(1);
		assert!(unit.total_memory()>before);
		assert_eq!(unit.forecast_total_memory(),unit.total_memory());
	}
}
