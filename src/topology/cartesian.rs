
use quantifiable_derive::Quantifiable;//the derive macro

use crate::error::Error;
use crate::source_location;
use super::check_router;

///A Cartesian ortahedral region of arbitrary dimension.
///The first coordinate changes fastest: `index = x + sides[0]*(y + sides[1]*(z + ...))`.
#[derive(Quantifiable)]
#[derive(Debug,Clone,PartialEq)]
pub struct CartesianData
{
	pub sides: Vec<usize>,
	pub size: usize,
}

impl CartesianData
{
	pub fn new(sides:&[usize]) -> CartesianData
	{
		CartesianData{
			sides:sides.to_vec(),
			size: sides.iter().product(),
		}
	}
	pub fn unpack(&self, mut router_index: usize) -> Vec<usize>
	{
		let mut r=Vec::with_capacity(self.sides.len());
		for side in self.sides.iter()
		{
			r.push(router_index%side);
			router_index/=side;
		}
		r
	}
}

///Shape of a two-dimensional mesh. Routers are numbered row by row.
#[derive(Quantifiable)]
#[derive(Debug,Clone,PartialEq)]
pub struct MeshShape
{
	cartesian_data: CartesianData,
}

impl MeshShape
{
	pub fn new(num_rows:usize, num_columns:usize) -> Result<MeshShape,Error>
	{
		if num_rows==0 || num_columns==0
		{
			return Err(Error::ill_formed_configuration(source_location!(),format!("A mesh needs positive sides, got {} rows and {} columns",num_rows,num_columns)));
		}
		Ok(MeshShape{
			cartesian_data: CartesianData::new(&[num_columns,num_rows]),
		})
	}
	///The mesh of `num_routers` routers with the given number of rows. The routers must fill whole rows.
	pub fn with_rows(num_routers:usize, num_rows:usize) -> Result<MeshShape,Error>
	{
		if num_rows==0 || num_routers%num_rows!=0
		{
			return Err(Error::ill_formed_configuration(source_location!(),format!("{} routers cannot be arranged in {} rows",num_routers,num_rows)));
		}
		MeshShape::new(num_rows,num_routers/num_rows)
	}
	pub fn num_rows(&self) -> usize
	{
		self.cartesian_data.sides[1]
	}
	pub fn num_columns(&self) -> usize
	{
		self.cartesian_data.sides[0]
	}
	pub fn size(&self) -> usize
	{
		self.cartesian_data.size
	}
	///The `(x,y)` coordinates of a router, with `x = id % columns` and `y = id / columns`.
	pub fn coordinates(&self, router:usize) -> Result<(usize,usize),Error>
	{
		check_router(router,self.size())?;
		let c=self.cartesian_data.unpack(router);
		Ok((c[0],c[1]))
	}
}

///Shape of a three-dimensional torus of sides `kx`, `ky` and `kz`.
#[derive(Quantifiable)]
#[derive(Debug,Clone,PartialEq)]
pub struct TorusShape
{
	cartesian_data: CartesianData,
}

impl TorusShape
{
	pub fn new(sides:[usize;3]) -> Result<TorusShape,Error>
	{
		if sides.iter().any(|&side|side==0)
		{
			return Err(Error::ill_formed_configuration(source_location!(),format!("A torus needs positive sides, got {:?}",sides)));
		}
		Ok(TorusShape{
			cartesian_data: CartesianData::new(&sides),
		})
	}
	///The cubic torus of `num_routers` routers. Fails if `num_routers` is not a perfect cube.
	pub fn infer(num_routers:usize) -> Result<TorusShape,Error>
	{
		let k=(num_routers as f64).cbrt().round() as usize;
		if k==0 || k*k*k!=num_routers
		{
			return Err(Error::ill_formed_configuration(source_location!(),format!("{} routers is not a perfect cube; the torus sides must be given explicitly",num_routers)));
		}
		TorusShape::new([k,k,k])
	}
	pub fn sides(&self) -> [usize;3]
	{
		let s=&self.cartesian_data.sides;
		[s[0],s[1],s[2]]
	}
	pub fn size(&self) -> usize
	{
		self.cartesian_data.size
	}
	///The `[x,y,z]` coordinates of a router: `x = id % kx`, `y = (id / kx) % ky`, `z = id / (kx*ky)`.
	pub fn coordinates(&self, router:usize) -> Result<[usize;3],Error>
	{
		check_router(router,self.size())?;
		let c=self.cartesian_data.unpack(router);
		Ok([c[0],c[1],c[2]])
	}
	///The minimal hop count and direction in each dimension to go from `origin` to `destination`.
	pub fn deltas(&self, origin:usize, destination:usize) -> Result<[(usize,Sign);3],Error>
	{
		let a=self.coordinates(origin)?;
		let b=self.coordinates(destination)?;
		let sides=self.sides();
		Ok([
			torus_delta(a[0],b[0],sides[0]),
			torus_delta(a[1],b[1],sides[1]),
			torus_delta(a[2],b[2],sides[2]),
		])
	}
	///Minimal number of hops between two routers.
	pub fn distance(&self, origin:usize, destination:usize) -> Result<usize,Error>
	{
		Ok(self.deltas(origin,destination)?.iter().map(|(hops,_)|hops).sum())
	}
}

///The way to go along a dimension.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Sign
{
	Positive,
	Negative,
}

///Hops and direction along a ring of `side` positions to go from `current` to `destination`.
///Going forward takes `d=(destination-current+side)%side` hops and going backward `side-d`. Ties go forward.
///When `current==destination` the result is `(0,Positive)`.
pub fn torus_delta(current:usize, destination:usize, side:usize) -> (usize,Sign)
{
	let forward=(destination+side-current)%side;
	if forward==0
	{
		return (0,Sign::Positive);
	}
	let backward=side-forward;
	if forward<=backward
	{
		(forward,Sign::Positive)
	}
	else
	{
		(backward,Sign::Negative)
	}
}
