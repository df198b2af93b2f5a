use std::mem::size_of;

use bitvec::prelude::{BitVec,Lsb0};

use crate::quantify::Quantifiable;

///A set of destination endpoints, such as the network interfaces reachable through a link or the targets of a packet.
///Stored as a bit set over endpoint indices. It grows to the largest endpoint added.
#[derive(Clone,Debug,Default)]
pub struct DestinationSet
{
	bits: BitVec<usize,Lsb0>,
}

impl DestinationSet
{
	pub fn new() -> DestinationSet
	{
		DestinationSet::default()
	}
	///A set containing exactly the given endpoints.
	pub fn from_endpoints<I:IntoIterator<Item=usize>>(endpoints:I) -> DestinationSet
	{
		let mut set=DestinationSet::new();
		for endpoint in endpoints
		{
			set.add(endpoint);
		}
		set
	}
	pub fn add(&mut self, endpoint:usize)
	{
		if endpoint>=self.bits.len()
		{
			self.bits.resize(endpoint+1,false);
		}
		self.bits.set(endpoint,true);
	}
	pub fn remove(&mut self, endpoint:usize)
	{
		if endpoint<self.bits.len()
		{
			self.bits.set(endpoint,false);
		}
	}
	pub fn contains(&self, endpoint:usize) -> bool
	{
		self.bits.get(endpoint).map_or(false,|bit|*bit)
	}
	///Whether some endpoint belongs to both sets.
	pub fn intersection_is_not_empty(&self, other:&DestinationSet) -> bool
	{
		self.bits.iter_ones().any(|endpoint|other.contains(endpoint))
	}
	pub fn is_empty(&self) -> bool
	{
		self.bits.not_any()
	}
	pub fn count(&self) -> usize
	{
		self.bits.count_ones()
	}
	///The endpoints of the set, in increasing order.
	pub fn iter(&self) -> impl Iterator<Item=usize> + '_
	{
		self.bits.iter_ones()
	}
}

impl PartialEq for DestinationSet
{
	///Sets are equal when they have the same endpoints, regardless of how far each one has grown.
	fn eq(&self, other:&DestinationSet) -> bool
	{
		self.iter().eq(other.iter())
	}
}

impl Eq for DestinationSet {}

impl Quantifiable for DestinationSet
{
	fn total_memory(&self) -> usize
	{
		size_of::<DestinationSet>() + self.bits.capacity()/8
	}
	fn print_memory_breakdown(&self)
	{
		println!("DestinationSet of {} endpoints: {} bytes",self.count(),self.total_memory());
	}
	fn forecast_total_memory(&self) -> usize
	{
		self.total_memory()
	}
}
