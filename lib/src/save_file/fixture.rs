use super::super::game_data::Localizer;

/// A small but complete gamestate, two systems linked by a hyperlane and a
/// natural wormhole
pub const SAMPLE_GAMESTATE: &str = r#"version="v4.0.2"
name="United Nations of Earth"
flags=
{
	first_contact=1
}
galactic_object=
{
	0=
	{
		coordinate=
		{
			x=10
			y=-20
			origin=4294967295
		}
		type=star
		name=
		{
			key="NAME_Sol"
		}
		planet=0
		planet=1
		planet=2
		star_class="sc_g"
		hyperlane=
		{
			{
				to=1
				length=30
			}
		}
		asteroid_belts=
		{
			{
				type="rocky_asteroid_belt"
				inner_radius=95
			}
		}
	}
	1=
	{
		coordinate=
		{
			x=40
			y=0
			origin=4294967295
		}
		type=star
		name=
		{
			key="NAME_Vega"
		}
		planet=3
		star_class="sc_a"
		hyperlane=
		{
			{
				to=0
				length=30
			}
		}
	}
	2=none
}
country=
{
	0=
	{
		planets=
		{
			planet=
			{
				99=
				{
					planet_class="pc_gaia"
				}
			}
		}
	}
}
planets=
{
	planet=
	{
		0=
		{
			name=
			{
				key="NAME_Sol"
			}
			planet_class="pc_g_star"
			coordinate=
			{
				x=0
				y=0
				origin=0
			}
			orbit=0
			planet_size=30
		}
		1=
		{
			name=
			{
				key="NAME_Earth"
			}
			planet_class="pc_continental"
			coordinate=
			{
				x=-40
				y=30
				origin=0
			}
			orbit=50
			planet_size=16
		}
		2=
		{
			name=
			{
				key="NAME_Luna"
			}
			planet_class="pc_barren_cold"
			coordinate=
			{
				x=-44
				y=33
				origin=0
			}
			orbit=5
			planet_size=5
			moon_of=1
		}
		3=
		{
			planet_class="pc_a_star"
			coordinate={ x=0 y=0 origin=1 }
			planet_size=25
		}
	}
}
nebula=
{
	coordinate=
	{
		x=100
		y=100
		origin=4294967295
	}
	name=
	{
		key="NEBULA_Crimson"
	}
	radius=45
	galactic_object=5
}
nebula={ coordinate={ x=-5 y=5 origin=4294967295 } radius=20 }
bypasses=
{
	10=
	{
		type="wormhole"
		linked_to=11
		owner=
		{
			type=6
			id=0
		}
	}
	11=
	{
		type="wormhole"
		linked_to=10
	}
	12=
	{
		type="gateway"
	}
}
natural_wormholes=
{
	0=
	{
		coordinate=
		{
			x=5
			y=5
			origin=0
		}
		bypass=10
	}
	1=
	{
		coordinate=
		{
			x=5
			y=5
			origin=1
		}
		bypass=11
	}
}
megastructures=
{
	20=
	{
		type="habitat_central"
		coordinate=
		{
			x=20
			y=0
			origin=0
		}
		planet=1
		graphical_culture="mammalian_01"
	}
	21=
	{
		type="gateway_final"
		coordinate=
		{
			x=30
			y=-30
			origin=1
		}
	}
	22=
	{
		type="dyson_sphere_0"
		coordinate=
		{
			x=0
			y=0
			origin=4294967295
		}
	}
}
"#;

pub fn sample_localizer() -> Localizer {
    [
        ("NAME_Sol", "Sol"),
        ("NAME_Earth", "Earth"),
        ("NAME_Vega", "Vega"),
        ("NEBULA_Crimson", "Crimson Nebula"),
    ]
    .into_iter()
    .collect()
}
