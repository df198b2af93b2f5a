/*!
Port directions and the registry mapping them to port indices at each router.

Each topology uses a closed vocabulary of directions. The topology builder registers, for every router, the index of the port it connects in each direction. After construction the registry is only read.
*/

use std::collections::BTreeMap;
use std::fmt::{Display,Formatter};
use std::mem::size_of;
use std::str::FromStr;

use quantifiable_derive::Quantifiable;//the derive macro

use crate::error::Error;
use crate::quantify::Quantifiable;
use crate::source_location;

///The direction of a port, as seen from the router owning it.
#[derive(Clone,Debug,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub enum PortDirection
{
	///Towards the network interfaces attached to the router.
	Local,
	//Mesh.
	North,
	South,
	East,
	West,
	//Ring.
	Clockwise,
	CounterClockwise,
	//Torus.
	PosX,
	NegX,
	PosY,
	NegY,
	PosZ,
	NegZ,
	///Butterfly link of the given stage towards the router with that bit set.
	Up(usize),
	///Butterfly link of the given stage towards the router with that bit cleared.
	Down(usize),
	//Railway bypass of the butterfly.
	Left,
	Right,
	///Any label used by a custom routing algorithm.
	Custom(String),
}

impl PortDirection
{
	///The direction of the inport at the other end of a link leaving by `self`.
	///Custom and local directions have no known opposite and are returned unchanged.
	pub fn opposite(&self) -> PortDirection
	{
		use PortDirection::*;
		match self
		{
			North => South,
			South => North,
			East => West,
			West => East,
			Clockwise => CounterClockwise,
			CounterClockwise => Clockwise,
			PosX => NegX,
			NegX => PosX,
			PosY => NegY,
			NegY => PosY,
			PosZ => NegZ,
			NegZ => PosZ,
			Up(stage) => Down(*stage),
			Down(stage) => Up(*stage),
			Left => Right,
			Right => Left,
			Local | Custom(_) => self.clone(),
		}
	}
}

impl Display for PortDirection
{
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::result::Result<(), std::fmt::Error>
	{
		use PortDirection::*;
		match self
		{
			Local => write!(formatter,"Local"),
			North => write!(formatter,"North"),
			South => write!(formatter,"South"),
			East => write!(formatter,"East"),
			West => write!(formatter,"West"),
			Clockwise => write!(formatter,"Clockwise"),
			CounterClockwise => write!(formatter,"CounterClockwise"),
			PosX => write!(formatter,"PosX"),
			NegX => write!(formatter,"NegX"),
			PosY => write!(formatter,"PosY"),
			NegY => write!(formatter,"NegY"),
			PosZ => write!(formatter,"PosZ"),
			NegZ => write!(formatter,"NegZ"),
			Up(stage) => write!(formatter,"Up_s{}",stage),
			Down(stage) => write!(formatter,"Down_s{}",stage),
			Left => write!(formatter,"Left"),
			Right => write!(formatter,"Right"),
			Custom(label) => write!(formatter,"{}",label),
		}
	}
}

impl FromStr for PortDirection
{
	type Err = std::convert::Infallible;
	///Any label that is not of the known vocabulary becomes `Custom`.
	fn from_str(label:&str) -> Result<PortDirection,Self::Err>
	{
		use PortDirection::*;
		let direction=match label
		{
			"Local" => Local,
			"North" => North,
			"South" => South,
			"East" => East,
			"West" => West,
			"Clockwise" => Clockwise,
			"CounterClockwise" => CounterClockwise,
			"PosX" => PosX,
			"NegX" => NegX,
			"PosY" => PosY,
			"NegY" => NegY,
			"PosZ" => PosZ,
			"NegZ" => NegZ,
			"Left" => Left,
			"Right" => Right,
			_ =>
			{
				let stage=|prefix:&str| label.strip_prefix(prefix).and_then(|s|s.parse::<usize>().ok());
				if let Some(stage)=stage("Up_s")
				{
					Up(stage)
				}
				else if let Some(stage)=stage("Down_s")
				{
					Down(stage)
				}
				else
				{
					Custom(label.to_string())
				}
			}
		};
		Ok(direction)
	}
}

impl Quantifiable for PortDirection
{
	fn total_memory(&self) -> usize
	{
		match self
		{
			PortDirection::Custom(label) => size_of::<PortDirection>() + label.capacity(),
			_ => size_of::<PortDirection>(),
		}
	}
	fn print_memory_breakdown(&self)
	{
		println!("PortDirection {}: {} bytes",self,self.total_memory());
	}
	fn forecast_total_memory(&self) -> usize
	{
		self.total_memory()
	}
}

///The mappings between directions and port indices of a router, one pair for inports and one pair for outports.
#[derive(Quantifiable)]
#[derive(Debug,Clone,Default,PartialEq)]
pub struct PortRegistry
{
	inports_direction_to_index: BTreeMap<PortDirection,usize>,
	inports_index_to_direction: BTreeMap<usize,PortDirection>,
	outports_direction_to_index: BTreeMap<PortDirection,usize>,
	outports_index_to_direction: BTreeMap<usize,PortDirection>,
}

impl PortRegistry
{
	pub fn new() -> PortRegistry
	{
		PortRegistry::default()
	}
	///Register the inport `index` as the one arriving from `direction`. The last registration of a direction wins.
	pub fn add_in_direction(&mut self, direction:PortDirection, index:usize)
	{
		insert_pair(&mut self.inports_direction_to_index,&mut self.inports_index_to_direction,direction,index);
	}
	///Register the outport `index` as the one leaving towards `direction`. The last registration of a direction wins.
	pub fn add_out_direction(&mut self, direction:PortDirection, index:usize)
	{
		insert_pair(&mut self.outports_direction_to_index,&mut self.outports_index_to_direction,direction,index);
	}
	///The outport leaving towards `direction`.
	pub fn outport(&self, direction:&PortDirection) -> Result<usize,Error>
	{
		self.outports_direction_to_index.get(direction).copied()
			.ok_or_else(||Error::unknown_direction(source_location!(),direction.clone()))
	}
	///The inport arriving from `direction`.
	pub fn inport(&self, direction:&PortDirection) -> Result<usize,Error>
	{
		self.inports_direction_to_index.get(direction).copied()
			.ok_or_else(||Error::unknown_direction(source_location!(),direction.clone()))
	}
	pub fn outport_direction(&self, index:usize) -> Result<&PortDirection,Error>
	{
		self.outports_index_to_direction.get(&index)
			.ok_or_else(||Error::unknown_port(source_location!(),index))
	}
	pub fn inport_direction(&self, index:usize) -> Result<&PortDirection,Error>
	{
		self.inports_index_to_direction.get(&index)
			.ok_or_else(||Error::unknown_port(source_location!(),index))
	}
	pub fn num_inports(&self) -> usize
	{
		self.inports_index_to_direction.len()
	}
	pub fn num_outports(&self) -> usize
	{
		self.outports_index_to_direction.len()
	}
	///The registered outports, by increasing index.
	pub fn outports(&self) -> impl Iterator<Item=(usize,&PortDirection)>
	{
		self.outports_index_to_direction.iter().map(|(index,direction)|(*index,direction))
	}
}

///Insert into both maps. Several ports may share a direction, as the `Local` ports of several network interfaces do; then the direction resolves to the last registered index.
fn insert_pair(direction_to_index:&mut BTreeMap<PortDirection,usize>, index_to_direction:&mut BTreeMap<usize,PortDirection>, direction:PortDirection, index:usize)
{
	direction_to_index.insert(direction.clone(),index);
	if let Some(old_direction)=index_to_direction.insert(index,direction.clone())
	{
		if old_direction!=direction && direction_to_index.get(&old_direction)==Some(&index)
		{
			direction_to_index.remove(&old_direction);
		}
	}
}
