/*!
Configuration values given to the builders of this crate.

A configuration is a tree of `ConfigurationValue`. An `Object` is written `Name { key1 : value1, key2 : value2, [...] }` and an `Array` is written `[value1, value2, value3, [...]]`. For example, the parameters of a network routed with the deterministic torus algorithm are

```text
Network
{
	routers: 64,
	routing: Torus3D { sides: [4,4,4] },
	ordered_virtual_networks: [false, true, false],
}
```

The values are built in code by the surrounding simulator; this crate does not parse configuration files.
*/

use std::fmt::{Display,Formatter,Error as FmtError};

use crate::error::Error;
use crate::source_location;

#[derive(Clone,Debug,PartialEq,PartialOrd)]
pub enum ConfigurationValue
{
	Literal(String),
	Number(f64),
	Object(String,Vec<(String,ConfigurationValue)>),
	Array(Vec<ConfigurationValue>),
	True,
	False,
	None,
}

impl Default for ConfigurationValue
{
	fn default()->ConfigurationValue
	{
		ConfigurationValue::None
	}
}

impl ConfigurationValue
{
	fn write(&self, f: &mut Formatter, indent:usize) -> Result<(),FmtError>
	{
		let is=String::from("\t").repeat(indent);
		write!(f,"{}",is)?;
		match self
		{
			&ConfigurationValue::Literal(ref s) => write!(f,"\"{}\"",s)?,
			&ConfigurationValue::Number(v) => write!(f,"{}",v)?,
			&ConfigurationValue::Object(ref name, ref list) =>
			{
				writeln!(f,"{}\n{}{{",name,is)?;
				for &(ref attr_name,ref attr_value) in list.iter()
				{
					writeln!(f,"{}\t{}:",is,attr_name)?;
					attr_value.write(f,indent+1)?;
					writeln!(f,",")?;
				}
				write!(f,"{}}}",is)?;
			},
			&ConfigurationValue::Array(ref list) =>
			{
				writeln!(f,"[")?;
				for elem in list.iter()
				{
					elem.write(f,indent+1)?;
					writeln!(f,",")?;
				}
				write!(f,"{}]",is)?;
			},
			&ConfigurationValue::True => write!(f,"true")?,
			&ConfigurationValue::False => write!(f,"false")?,
			&ConfigurationValue::None => write!(f,"NONE VALUE")?,
		};
		Ok(())
	}
	///The number inside, or an `IllFormedConfiguration` error naming `what`.
	pub fn as_f64(&self, what:&str) -> Result<f64,Error>
	{
		match self
		{
			&ConfigurationValue::Number(x) => Ok(x),
			_ => Err(Error::ill_formed_configuration(source_location!(),format!("bad value for {}: expected a number, got {}",what,self))),
		}
	}
	///A non-negative integer, such as a size or an index.
	pub fn as_usize(&self, what:&str) -> Result<usize,Error>
	{
		let x=self.as_f64(what)?;
		if x<0.0 || x.fract()!=0.0
		{
			return Err(Error::ill_formed_configuration(source_location!(),format!("bad value for {}: expected a non-negative integer, got {}",what,x)));
		}
		Ok(x as usize)
	}
	pub fn as_bool(&self, what:&str) -> Result<bool,Error>
	{
		match self
		{
			&ConfigurationValue::True => Ok(true),
			&ConfigurationValue::False => Ok(false),
			_ => Err(Error::ill_formed_configuration(source_location!(),format!("bad value for {}: expected true or false, got {}",what,self))),
		}
	}
	pub fn as_str(&self, what:&str) -> Result<&str,Error>
	{
		match self
		{
			&ConfigurationValue::Literal(ref s) => Ok(s),
			_ => Err(Error::ill_formed_configuration(source_location!(),format!("bad value for {}: expected a literal, got {}",what,self))),
		}
	}
	pub fn as_array(&self, what:&str) -> Result<&Vec<ConfigurationValue>,Error>
	{
		match self
		{
			&ConfigurationValue::Array(ref a) => Ok(a),
			_ => Err(Error::ill_formed_configuration(source_location!(),format!("bad value for {}: expected an array, got {}",what,self))),
		}
	}
}

impl Display for ConfigurationValue
{
	fn fmt(&self,f:&mut Formatter)->Result<(),FmtError>
	{
		self.write(f,0)
	}
}

///Iterate over the pairs of an object named `$name`, binding each value to `$valueid` and matching each key against the given arms.
///The key `legend_name` is always accepted and ignored. Any other key, or an object with another name, returns an `IllFormedConfiguration` error from the enclosing function.
///```ignore
///match_object!(cv,"Ring",value,
///	"routers" => routers=Some(value.as_usize("routers")?),
///);
///```
#[macro_export]
macro_rules! match_object{
	($cv:expr, $name:literal, $valueid:ident, $($key:literal => $arm:expr),* $(,)?) => {{
		if let &$crate::config::ConfigurationValue::Object(ref cv_name, ref cv_pairs)=$cv
		{
			if cv_name!=$name
			{
				return Err($crate::error::Error::ill_formed_configuration($crate::source_location!(),format!("A {} must be created from a `{}` object not `{}`",$name,$name,cv_name)));
			}
			for &(ref name,ref $valueid) in cv_pairs
			{
				match AsRef::<str>::as_ref(&name)
				{
					$( $key => { $arm; } )*
					"legend_name" => (),
					_ => return Err($crate::error::Error::ill_formed_configuration($crate::source_location!(),format!("Nothing to do with field {} in {}",name,$name))),
				}
			}
		}
		else
		{
			return Err($crate::error::Error::ill_formed_configuration($crate::source_location!(),format!("Trying to create a {} from a non-Object",$name)));
		}
	}};
}
