/*!
The static routing table of a router.

The table is populated during topology creation. For each virtual network it stores, for every outgoing link, the set of destinations that can be reached through that link. A parallel weight table holds one weight per link; lower weights are preferred. Routes can be biased via weight assignments in the topology, and correct weight assignments are critical to provide deadlock avoidance. The routing never modifies weights.
*/

use std::cell::RefCell;

use ::rand::{Rng,rngs::StdRng};
use quantifiable_derive::Quantifiable;//the derive macro

use crate::destination::DestinationSet;
use crate::error::Error;
use crate::source_location;

#[derive(Quantifiable)]
#[derive(Debug,Clone,Default)]
pub struct RoutingTable
{
	///routes[vnet][link] = destinations reachable through `link` in the virtual network `vnet`.
	routes: Vec<Vec<DestinationSet>>,
	///weights[link] = preference of `link`, lower is better.
	weights: Vec<i32>,
}

impl RoutingTable
{
	pub fn new() -> RoutingTable
	{
		RoutingTable::default()
	}
	///Append a link, giving the destinations it reaches in each virtual network.
	///The link index is the number of links in the table before the call.
	pub fn add_route(&mut self, entry:Vec<DestinationSet>)
	{
		if entry.len()>self.routes.len()
		{
			self.routes.resize(entry.len(),vec![]);
		}
		for (vnet,destinations) in entry.into_iter().enumerate()
		{
			self.routes[vnet].push(destinations);
		}
	}
	///Append the weight of the next link.
	pub fn add_weight(&mut self, weight:i32)
	{
		self.weights.push(weight);
	}
	pub fn num_vnets(&self) -> usize
	{
		self.routes.len()
	}
	///Number of links known for the widest virtual network.
	pub fn num_links(&self) -> usize
	{
		self.routes.iter().map(|row|row.len()).max().unwrap_or(0)
	}
	pub fn weight(&self, link:usize) -> Option<i32>
	{
		self.weights.get(link).copied()
	}
	///Check that every link has its weight. To be called once the topology has been built.
	pub fn validate(&self) -> Result<(),Error>
	{
		let links=self.num_links();
		if links!=self.weights.len()
		{
			return Err(Error::table_size_mismatch(source_location!(),links,self.weights.len()));
		}
		Ok(())
	}
	///Select the output link towards `destination` in the virtual network `vnet`.
	///All candidate links of minimum weight are collected. For an ordered virtual network the first of them is taken, so that packets of a flow never take different routes.
	///Otherwise one of them is drawn at random. To have a strict order among links they should be given different weights.
	pub fn lookup(&self, vnet:usize, destination:&DestinationSet, ordered:bool, rng:&RefCell<StdRng>) -> Result<usize,Error>
	{
		let row=match self.routes.get(vnet)
		{
			Some(row) => row,
			None => return Err(Error::no_route_exists(source_location!(),vnet).with_message(format!("The table has no entries for virtual network {}; it has {} virtual networks.",vnet,self.routes.len()))),
		};
		if row.len()>self.weights.len()
		{
			return Err(Error::table_size_mismatch(source_location!(),row.len(),self.weights.len()));
		}
		let is_candidate=|link:&usize| destination.intersection_is_not_empty(&row[*link]);
		//First the minimum weight among all the candidates.
		let min_weight=match (0..row.len()).filter(is_candidate).map(|link|self.weights[link]).min()
		{
			Some(weight) => weight,
			None => return Err(Error::no_route_exists(source_location!(),vnet)),
		};
		//Then every candidate with that weight, in link order.
		let candidates:Vec<usize>=(0..row.len()).filter(is_candidate).filter(|link|self.weights[*link]==min_weight).collect();
		let chosen=if ordered
		{
			0
		}
		else
		{
			rng.borrow_mut().gen_range(0..candidates.len())
		};
		Ok(candidates[chosen])
	}
}

///Whether a link restricted to the virtual networks `supported` can carry `vnet`. An empty list means all virtual networks are supported.
pub fn supports_vnet(vnet:usize, supported:&[usize]) -> bool
{
	supported.is_empty() || supported.contains(&vnet)
}
