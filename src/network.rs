/*!
Parameters shared by all the routers of a network: the routing algorithm and the description of the network it needs.

The parameters are fixed when the network is built. Every router holds the same `Arc<NetworkParameters>` and only reads it.
*/

use std::fmt::{Display,Formatter};

use crate::config::ConfigurationValue;
use crate::error::Error;
use crate::topology::{MeshShape,TorusShape};
use crate::{match_object,source_location};

///The algorithm used by every router to compute outports.
#[derive(Debug,Clone,PartialEq)]
pub enum RoutingAlgorithm
{
	///Use the routing table built with the topology.
	Table,
	///Dimension order in a two-dimensional mesh, first X then Y.
	MeshXY(MeshShape),
	///Shortest way around a ring, clockwise on ties.
	Ring,
	///Dimension order X, Y, Z in a three-dimensional torus, using wrap-around links.
	Torus3D(TorusShape),
	///Random choice among the productive X/Y directions of a three-dimensional torus, then Z.
	Torus3DAdaptive(TorusShape),
	///Correct the highest differing bit in a butterfly.
	Butterfly,
	///Choose between the butterfly and a direct railway link by the outstanding requests at each port.
	ButterflyRailway,
	///An algorithm provided by the user in the `Plugs`, by name.
	Custom(String),
}

impl RoutingAlgorithm
{
	///Build the algorithm from a configuration object such as `Torus3D { sides: [4,4,4] }`.
	///`num_routers` is used to complete the shapes not given explicitly.
	pub fn new(cv:&ConfigurationValue, num_routers:usize) -> Result<RoutingAlgorithm,Error>
	{
		let name:&str=match cv
		{
			&ConfigurationValue::Object(ref name, _) => name.as_str(),
			&ConfigurationValue::Literal(ref name) => name.as_str(),
			_ => return Err(Error::ill_formed_configuration(source_location!(),format!("Trying to create a RoutingAlgorithm from a non-Object: {}",cv))),
		};
		//A bare literal names an algorithm without arguments.
		let object;
		let cv=if let &ConfigurationValue::Literal(_)=cv
		{
			object=ConfigurationValue::Object(name.to_string(),vec![]);
			&object
		}
		else
		{
			cv
		};
		match name
		{
			"Table" =>
			{
				match_object!(cv,"Table",_value,);
				Ok(RoutingAlgorithm::Table)
			},
			"MeshXY" =>
			{
				let mut rows=None;
				let mut columns=None;
				match_object!(cv,"MeshXY",value,
					"rows" => rows=Some(value.as_usize("rows")?),
					"columns" => columns=Some(value.as_usize("columns")?),
				);
				let mesh=match (rows,columns)
				{
					(Some(rows),Some(columns)) => MeshShape::new(rows,columns)?,
					(Some(rows),None) => MeshShape::with_rows(num_routers,rows)?,
					(None,Some(columns)) => MeshShape::new(num_routers/columns.max(1),columns)?,
					(None,None) => return Err(Error::ill_formed_configuration(source_location!(),"There were no rows in MeshXY".to_string())),
				};
				if mesh.size()!=num_routers
				{
					return Err(Error::ill_formed_configuration(source_location!(),format!("A MeshXY of {}x{} does not have {} routers",mesh.num_rows(),mesh.num_columns(),num_routers)));
				}
				Ok(RoutingAlgorithm::MeshXY(mesh))
			},
			"Ring" =>
			{
				match_object!(cv,"Ring",_value,);
				Ok(RoutingAlgorithm::Ring)
			},
			"Torus3D" => Ok(RoutingAlgorithm::Torus3D(torus_shape(cv,"Torus3D",num_routers)?)),
			"Torus3DAdaptive" => Ok(RoutingAlgorithm::Torus3DAdaptive(torus_shape(cv,"Torus3DAdaptive",num_routers)?)),
			"Butterfly" =>
			{
				match_object!(cv,"Butterfly",_value,);
				Ok(RoutingAlgorithm::Butterfly)
			},
			"ButterflyRailway" =>
			{
				match_object!(cv,"ButterflyRailway",_value,);
				Ok(RoutingAlgorithm::ButterflyRailway)
			},
			"Custom" =>
			{
				let mut custom_name=None;
				match_object!(cv,"Custom",value,
					"name" => custom_name=Some(value.as_str("name")?.to_string()),
				);
				Ok(RoutingAlgorithm::Custom(custom_name.unwrap_or_default()))
			},
			_ => Err(Error::ill_formed_configuration(source_location!(),format!("Unknown routing algorithm {}",name))),
		}
	}
	///Name of the algorithm, as used in the configuration.
	pub fn name(&self) -> &str
	{
		match self
		{
			RoutingAlgorithm::Table => "Table",
			RoutingAlgorithm::MeshXY(_) => "MeshXY",
			RoutingAlgorithm::Ring => "Ring",
			RoutingAlgorithm::Torus3D(_) => "Torus3D",
			RoutingAlgorithm::Torus3DAdaptive(_) => "Torus3DAdaptive",
			RoutingAlgorithm::Butterfly => "Butterfly",
			RoutingAlgorithm::ButterflyRailway => "ButterflyRailway",
			RoutingAlgorithm::Custom(_) => "Custom",
		}
	}
}

impl Display for RoutingAlgorithm
{
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::result::Result<(), std::fmt::Error>
	{
		match self
		{
			RoutingAlgorithm::Custom(name) if !name.is_empty() => write!(formatter,"Custom({})",name),
			_ => write!(formatter,"{}",self.name()),
		}
	}
}

fn torus_shape(cv:&ConfigurationValue, name:&'static str, num_routers:usize) -> Result<TorusShape,Error>
{
	let mut sides=None;
	match cv
	{
		&ConfigurationValue::Object(ref cv_name, _) if cv_name=="Torus3D" =>
		{
			match_object!(cv,"Torus3D",value,
				"sides" => sides=Some(value.as_array("sides")?.iter().map(|v|v.as_usize("sides")).collect::<Result<Vec<usize>,Error>>()?),
			);
		},
		_ =>
		{
			match_object!(cv,"Torus3DAdaptive",value,
				"sides" => sides=Some(value.as_array("sides")?.iter().map(|v|v.as_usize("sides")).collect::<Result<Vec<usize>,Error>>()?),
			);
		},
	}
	let shape=match sides
	{
		Some(sides) =>
		{
			if sides.len()!=3
			{
				return Err(Error::ill_formed_configuration(source_location!(),format!("{} requires 3 sides, got {:?}",name,sides)));
			}
			TorusShape::new([sides[0],sides[1],sides[2]])?
		},
		None => TorusShape::infer(num_routers)?,
	};
	if shape.size()!=num_routers
	{
		return Err(Error::ill_formed_configuration(source_location!(),format!("The sides {:?} of {} do not multiply to {} routers",shape.sides(),name,num_routers)));
	}
	Ok(shape)
}

///What the routers need to know about the whole network.
#[derive(Debug,Clone,PartialEq)]
pub struct NetworkParameters
{
	///Total number of routers. Routers are indexed in `0..num_routers`.
	pub num_routers: usize,
	///The algorithm every router uses.
	pub routing_algorithm: RoutingAlgorithm,
	///ordered_virtual_networks[vnet] tells whether packets in `vnet` must be delivered in order. Virtual networks beyond the list are unordered.
	pub ordered_virtual_networks: Vec<bool>,
}

impl NetworkParameters
{
	pub fn new(num_routers:usize, routing_algorithm:RoutingAlgorithm) -> NetworkParameters
	{
		NetworkParameters{
			num_routers,
			routing_algorithm,
			ordered_virtual_networks: vec![],
		}
	}
	///Set which virtual networks are ordered.
	pub fn with_ordered_virtual_networks(mut self, ordered:Vec<bool>) -> NetworkParameters
	{
		self.ordered_virtual_networks=ordered;
		self
	}
	///Build from a `Network` configuration object.
	pub fn from_configuration(cv:&ConfigurationValue) -> Result<NetworkParameters,Error>
	{
		let mut routers=None;
		let mut routing=None;
		let mut ordered_virtual_networks=vec![];
		match_object!(cv,"Network",value,
			"routers" => routers=Some(value.as_usize("routers")?),
			"routing" => routing=Some(value),
			"ordered_virtual_networks" => ordered_virtual_networks=value.as_array("ordered_virtual_networks")?.iter()
				.map(|v|v.as_bool("ordered_virtual_networks")).collect::<Result<Vec<bool>,Error>>()?,
		);
		let num_routers=routers.ok_or_else(||Error::ill_formed_configuration(source_location!(),"There were no routers".to_string()))?;
		if num_routers==0
		{
			return Err(Error::ill_formed_configuration(source_location!(),"A network needs at least one router".to_string()));
		}
		let routing=routing.ok_or_else(||Error::ill_formed_configuration(source_location!(),"There were no routing".to_string()))?;
		let routing_algorithm=RoutingAlgorithm::new(routing,num_routers)?;
		Ok(NetworkParameters{
			num_routers,
			routing_algorithm,
			ordered_virtual_networks,
		})
	}
	///Check that there are routers and that the shape of the algorithm covers exactly them.
	pub fn validate(&self) -> Result<(),Error>
	{
		if self.num_routers==0
		{
			return Err(Error::ill_formed_configuration(source_location!(),"A network needs at least one router".to_string()));
		}
		let shape_size=match self.routing_algorithm
		{
			RoutingAlgorithm::MeshXY(ref mesh) => mesh.size(),
			RoutingAlgorithm::Torus3D(ref torus) | RoutingAlgorithm::Torus3DAdaptive(ref torus) => torus.size(),
			_ => return Ok(()),
		};
		if shape_size!=self.num_routers
		{
			return Err(Error::ill_formed_configuration(source_location!(),format!("The {} routing covers {} routers but the network has {}",self.routing_algorithm.name(),shape_size,self.num_routers)));
		}
		Ok(())
	}
	pub fn is_vnet_ordered(&self, vnet:usize) -> bool
	{
		self.ordered_virtual_networks.get(vnet).copied().unwrap_or(false)
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::error::ErrorKind;

	fn object(name:&str, pairs:Vec<(&str,ConfigurationValue)>) -> ConfigurationValue
	{
		ConfigurationValue::Object(name.to_string(),pairs.into_iter().map(|(k,v)|(k.to_string(),v)).collect())
	}

	fn numbers(values:&[f64]) -> ConfigurationValue
	{
		ConfigurationValue::Array(values.iter().map(|&x|ConfigurationValue::Number(x)).collect())
	}

	#[test]
	fn torus_network_from_configuration()
	{
		let cv=object("Network",vec![
			("routers",ConfigurationValue::Number(64.0)),
			("routing",object("Torus3D",vec![("sides",numbers(&[4.0,4.0,4.0]))])),
			("ordered_virtual_networks",ConfigurationValue::Array(vec![ConfigurationValue::False,ConfigurationValue::True])),
		]);
		let parameters=NetworkParameters::from_configuration(&cv).unwrap();
		assert_eq!(parameters.num_routers,64);
		assert_eq!(parameters.routing_algorithm,RoutingAlgorithm::Torus3D(TorusShape::new([4,4,4]).unwrap()));
		assert!(!parameters.is_vnet_ordered(0));
		assert!(parameters.is_vnet_ordered(1));
		assert!(!parameters.is_vnet_ordered(7));
	}

	#[test]
	fn torus_sides_are_inferred_from_a_cube()
	{
		let algorithm=RoutingAlgorithm::new(&ConfigurationValue::Literal("Torus3DAdaptive".to_string()),27).unwrap();
		assert_eq!(algorithm,RoutingAlgorithm::Torus3DAdaptive(TorusShape::new([3,3,3]).unwrap()));
		assert!(RoutingAlgorithm::new(&object("Torus3D",vec![]),30).is_err());
		assert!(RoutingAlgorithm::new(&object("Torus3D",vec![("sides",numbers(&[2.0,3.0,4.0]))]),30).is_err());
	}

	#[test]
	fn mesh_columns_follow_from_rows()
	{
		let algorithm=RoutingAlgorithm::new(&object("MeshXY",vec![("rows",ConfigurationValue::Number(2.0))]),8).unwrap();
		match algorithm
		{
			RoutingAlgorithm::MeshXY(ref mesh) =>
			{
				assert_eq!(mesh.num_rows(),2);
				assert_eq!(mesh.num_columns(),4);
			},
			_ => panic!("expected a MeshXY, got {}",algorithm),
		}
		assert!(RoutingAlgorithm::new(&object("MeshXY",vec![("rows",ConfigurationValue::Number(3.0))]),8).is_err());
	}

	#[test]
	fn simple_algorithms_by_name()
	{
		for (name,expected) in vec![("Table",RoutingAlgorithm::Table),("Ring",RoutingAlgorithm::Ring),("Butterfly",RoutingAlgorithm::Butterfly),("ButterflyRailway",RoutingAlgorithm::ButterflyRailway)]
		{
			assert_eq!(RoutingAlgorithm::new(&object(name,vec![]),8).unwrap(),expected);
			assert_eq!(expected.name(),name);
		}
		let custom=RoutingAlgorithm::new(&object("Custom",vec![("name",ConfigurationValue::Literal("westfirst".to_string()))]),8).unwrap();
		assert_eq!(custom,RoutingAlgorithm::Custom("westfirst".to_string()));
		assert_eq!(custom.to_string(),"Custom(westfirst)");
	}

	#[test]
	fn bad_configurations_are_rejected()
	{
		let error=RoutingAlgorithm::new(&object("Hypercube",vec![]),8).unwrap_err();
		assert_eq!(error.kind,ErrorKind::IllFormedConfiguration);
		assert!(RoutingAlgorithm::new(&object("Ring",vec![("sides",ConfigurationValue::Number(2.0))]),8).is_err());
		let no_routing=object("Network",vec![("routers",ConfigurationValue::Number(8.0))]);
		assert!(NetworkParameters::from_configuration(&no_routing).is_err());
	}

	#[test]
	fn shapes_must_cover_the_routers()
	{
		let mesh=RoutingAlgorithm::MeshXY(MeshShape::new(4,4).unwrap());
		assert!(NetworkParameters::new(16,mesh.clone()).validate().is_ok());
		assert_eq!(NetworkParameters::new(20,mesh).validate().unwrap_err().kind,ErrorKind::IllFormedConfiguration);
		let torus=TorusShape::new([2,2,2]).unwrap();
		assert!(NetworkParameters::new(8,RoutingAlgorithm::Torus3DAdaptive(torus.clone())).validate().is_ok());
		assert!(NetworkParameters::new(9,RoutingAlgorithm::Torus3D(torus)).validate().is_err());
		assert!(NetworkParameters::new(0,RoutingAlgorithm::Ring).validate().is_err());
		assert!(NetworkParameters::new(5,RoutingAlgorithm::Ring).validate().is_ok());
	}
}
