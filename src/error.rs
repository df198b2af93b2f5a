/*!

This module is for managing errors in the code of noc-routing-lib. Every error of a routing decision is fatal: a wrong or missing route is a bug in the topology or in the configuration, never a transient condition. Errors are returned to the caller, which is expected to stop the run.

Instead of `expect` or `unwrap_or_else` try
* `ok_or_else` like in `.ok_or_else( ||Error::unknown_direction(source_location!(),direction.clone()) )?;`
* `map_err` to attach a message, like in `.map_err(|e|e.with_message(format!("at router {}",router)))?;`

Instead of `panic!` try
* Return an error. E.g., by `return Err( Error::new(source_location!(),ErrorKind::NoRouteExists{vnet}) );`

*/

use std::fmt::{Display,Formatter};

use crate::port::PortDirection;

/// The main Error class to be used in each `Result(Whatever,Error)`.
/// It contains the code source of the error and its kind.
/// An arbitrary `String` message can be optionally attached.
#[derive(Debug)]
pub struct Error
{
	pub source_location: SourceLocation,
	pub kind: ErrorKind,
	pub message: Option<String>,
}

/// A source code location where an error occurred.
/// Contains the values of the macros `std::{file,line,column}`.
#[derive(Debug)]
pub struct SourceLocation
{
	pub file: &'static str,
	pub line: u32,
	pub column: u32,
}

#[derive(Debug,Clone,PartialEq)]
pub enum ErrorKind
{
	/// A direction has no port registered at the current router.
	UnknownDirection{
		direction: PortDirection,
	},
	/// A port index has no direction registered at the current router.
	UnknownPort{
		port: usize,
	},
	/// No link of the routing table reaches the destination in this virtual network.
	NoRouteExists{
		vnet: usize,
	},
	/// A dimension-order or turn-model assertion failed.
	/// `outport_direction` is `None` when no direction could be computed at all.
	RoutingInvariantViolation{
		inport_direction: PortDirection,
		outport_direction: Option<PortDirection>,
	},
	/// A router index out of `0..num_routers`.
	DestinationUnreachable{
		node: usize,
		num_routers: usize,
	},
	/// The selected routing algorithm has no implementation available.
	NotImplemented{
		algorithm: String,
	},
	/// The routing table and the weight table do not describe the same links.
	TableSizeMismatch{
		links: usize,
		weights: usize,
	},
	/// Some configuration value could not be understood.
	IllFormedConfiguration,
}

// source_location!()
#[macro_export]
macro_rules! source_location{
	() => {
		$crate::error::SourceLocation{
			file: file!(),
			line: line!(),
			column: column!(),
		}
	}
}

use ErrorKind::*;

impl Error
{
	pub fn new(source_location:SourceLocation, kind:ErrorKind) -> Error
	{
		Error{
			source_location,
			kind,
			message:None,
		}
	}
	pub fn with_message(mut self,message:String) -> Error
	{
		self.message=Some(match self.message
		{
			Some(previous) => format!("{}\n{}",message,previous),
			None => message,
		});
		self
	}
	/// example call: Error::unknown_direction(source_location!(),PortDirection::North).
	pub fn unknown_direction(source_location:SourceLocation,direction:PortDirection)->Error
	{
		Error::new(source_location,UnknownDirection{direction})
	}
	pub fn unknown_port(source_location:SourceLocation,port:usize)->Error
	{
		Error::new(source_location,UnknownPort{port})
	}
	pub fn no_route_exists(source_location:SourceLocation,vnet:usize)->Error
	{
		Error::new(source_location,NoRouteExists{vnet})
	}
	pub fn routing_invariant_violation(source_location:SourceLocation,inport_direction:PortDirection,outport_direction:Option<PortDirection>)->Error
	{
		Error::new(source_location,RoutingInvariantViolation{
			inport_direction,
			outport_direction,
		})
	}
	pub fn destination_unreachable(source_location:SourceLocation,node:usize,num_routers:usize)->Error
	{
		Error::new(source_location,DestinationUnreachable{
			node,
			num_routers,
		})
	}
	pub fn not_implemented(source_location:SourceLocation,algorithm:String)->Error
	{
		Error::new(source_location,NotImplemented{algorithm})
	}
	pub fn table_size_mismatch(source_location:SourceLocation,links:usize,weights:usize)->Error
	{
		Error::new(source_location,TableSizeMismatch{
			links,
			weights,
		})
	}
	pub fn ill_formed_configuration(source_location:SourceLocation,message:String)->Error
	{
		Error::new(source_location,IllFormedConfiguration).with_message(message)
	}
}

impl Display for Error
{
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::result::Result<(), std::fmt::Error>
	{
		let Error{source_location:location,kind,message} = self;
		writeln!(formatter,"Error at file {} at line {} column {}.",location.file,location.line,location.column)?;
		if let Some(text) = message
		{
			writeln!(formatter,"{}",text)?;
		}
		kind.fmt(formatter)?;
		Ok(())
	}
}

impl Display for ErrorKind
{
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::result::Result<(), std::fmt::Error>
	{
		match self
		{
			UnknownDirection{direction} =>
			{
				writeln!(formatter,"UnknownDirection error: the direction {} has no registered port at this router.",direction)?;
			},
			UnknownPort{port} =>
			{
				writeln!(formatter,"UnknownPort error: the port {} has no registered direction at this router.",port)?;
			},
			NoRouteExists{vnet} =>
			{
				writeln!(formatter,"NoRouteExists error: no route exists from this router in virtual network {}.",vnet)?;
			},
			RoutingInvariantViolation{inport_direction,outport_direction} =>
			{
				match outport_direction
				{
					Some(outport_direction) => writeln!(formatter,"RoutingInvariantViolation error: a packet entering by {} cannot leave by {}.",inport_direction,outport_direction)?,
					None => writeln!(formatter,"RoutingInvariantViolation error: no hop remains for a packet entering by {}, but it is not at its destination.",inport_direction)?,
				}
			},
			DestinationUnreachable{node,num_routers} =>
			{
				writeln!(formatter,"DestinationUnreachable error: the router {} is outside a network of {} routers.",node,num_routers)?;
			},
			NotImplemented{algorithm} =>
			{
				writeln!(formatter,"NotImplemented error: the routing algorithm {} has no implementation plugged.",algorithm)?;
			},
			TableSizeMismatch{links,weights} =>
			{
				writeln!(formatter,"TableSizeMismatch error: the routing table has {} links but the weight table has {} weights.",links,weights)?;
			},
			IllFormedConfiguration =>
			{
				writeln!(formatter,"IllFormedConfiguration error: some configuration value could not be understood.")?;
			},
		}
		Ok(())
	}
}

impl std::error::Error for Error {}
